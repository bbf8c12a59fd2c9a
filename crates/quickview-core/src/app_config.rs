use std::path::PathBuf;
use std::time::Duration;

/// Which catalog endpoint shape the modal loads products from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// `GET /products/{handle}.json`: `option1`/`option2` fields, decimal-string prices.
    Json,
    /// `GET /products/{handle}.js`: positional `options[]`, minor-unit prices.
    Js,
}

impl std::fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogFormat::Json => write!(f, "json"),
            CatalogFormat::Js => write!(f, "js"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storefront origin, e.g. `https://shop.example.com`.
    pub store_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub catalog_format: CatalogFormat,
    /// Storefront money format, e.g. `"${{amount}}"`.
    pub money_format: String,
    /// Delay before the modal closes itself after a successful add.
    pub auto_close_delay: Duration,
    /// Optional YAML file of promotion rules; `None` uses the built-in rule.
    pub promotions_path: Option<PathBuf>,
}
