pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod types;

pub use client::StorefrontClient;
pub use error::StorefrontError;
pub use normalize::{normalize_js_product, normalize_json_product};
pub use types::{CartAddResponse, JsProduct, JsonProduct, ProductsListResponse};
