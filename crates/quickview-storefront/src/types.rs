//! Storefront API response and request types.
//!
//! ## Two product shapes
//!
//! The storefront serves the same product through two endpoints with
//! different layouts. Both are normalized into [`quickview_core::Product`]
//! by [`crate::normalize`].
//!
//! ### `GET /products/{handle}.json`
//! Wrapped in `{"product": {...}}`. Variants carry their option values in
//! `option1`, `option2`, `option3` (null when the product has fewer options).
//! Prices are decimal strings (`"27.00"`). The description is `body_html`
//! and the image is an object under `image` (plus the `images` gallery).
//! The same product layout appears in the `GET /products.json` listing.
//!
//! ### `GET /products/{handle}.js`
//! The bare product object. Variants carry an `options` array aligned with
//! the product's `options[].position`. Prices are integers in minor units
//! (`2700`). The description is `description` and the image is the
//! `featured_image` URL string, which is often protocol-relative
//! (`//cdn.example.com/...`).
//!
//! ### Option positions
//! Both shapes report `options[].position` 1-based. It may be absent on
//! older themes; array order is used then.
//!
//! ### `available` on variants
//! May be absent on the `.json` shape. Defaults to `true`.

use quickview_core::VariantId;
use serde::{Deserialize, Serialize};

/// Top-level response from `GET /products/{handle}.json`.
#[derive(Debug, Deserialize)]
pub struct ProductJsonEnvelope {
    pub product: JsonProduct,
}

/// Top-level response from `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct ProductsListResponse {
    pub products: Vec<JsonProduct>,
}

/// A product in the `.json` layout.
#[derive(Debug, Deserialize)]
pub struct JsonProduct {
    pub id: u64,
    pub title: String,
    pub handle: String,

    /// Raw HTML description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,

    #[serde(default)]
    pub image: Option<JsonImage>,

    #[serde(default)]
    pub images: Vec<JsonImage>,

    #[serde(default)]
    pub options: Vec<CatalogOption>,

    pub variants: Vec<JsonVariant>,
}

/// A variant in the `.json` layout.
#[derive(Debug, Deserialize)]
pub struct JsonVariant {
    pub id: u64,

    /// `"Black / Medium"`, or `"Default Title"` for single-variant products.
    pub title: String,

    /// Decimal string, e.g. `"27.00"`.
    pub price: String,

    #[serde(default = "default_available")]
    pub available: bool,

    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
}

impl JsonVariant {
    /// Option slots in order. Trailing `None`s are kept so callers can
    /// tell a missing value from a missing option.
    #[must_use]
    pub fn option_slots(&self) -> [Option<&str>; 3] {
        [
            self.option1.as_deref(),
            self.option2.as_deref(),
            self.option3.as_deref(),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonImage {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// An option axis; identical in both layouts.
#[derive(Debug, Deserialize)]
pub struct CatalogOption {
    pub name: String,
    /// 1-based. Absent on some older themes.
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub values: Vec<String>,
}

/// A product in the `.js` layout.
#[derive(Debug, Deserialize)]
pub struct JsProduct {
    pub id: u64,
    pub title: String,
    pub handle: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Image URL, possibly protocol-relative.
    #[serde(default)]
    pub featured_image: Option<String>,

    /// Minor units. The lowest variant price on most themes.
    #[serde(default)]
    pub price: Option<i64>,

    #[serde(default)]
    pub options: Vec<CatalogOption>,

    pub variants: Vec<JsVariant>,
}

/// A variant in the `.js` layout.
#[derive(Debug, Deserialize)]
pub struct JsVariant {
    pub id: u64,
    pub title: String,
    /// Minor units.
    pub price: i64,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Values aligned with the product's option positions.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Body of `POST /cart/add.js`.
#[derive(Debug, Serialize)]
pub struct CartAddRequest {
    pub items: Vec<CartAddItem>,
}

#[derive(Debug, Serialize)]
pub struct CartAddItem {
    pub id: VariantId,
    pub quantity: u32,
}

/// Response of `POST /cart/add.js`: the line items that were added.
///
/// Only the fields the flow logs are modelled; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct CartAddResponse {
    #[serde(default)]
    pub items: Vec<CartLineItem>,
}

#[derive(Debug, Deserialize)]
pub struct CartLineItem {
    #[serde(default)]
    pub variant_id: Option<u64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Error body of a rejected cart add, e.g.
/// `{"status": 422, "message": "Cart Error", "description": "All 1 Soft Winter Jacket are in your cart."}`.
#[derive(Debug, Deserialize)]
pub struct CartErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Default for `available` when the field is absent.
///
/// serde's `default = "..."` needs a function path, hence not a `const`.
fn default_available() -> bool {
    true
}
