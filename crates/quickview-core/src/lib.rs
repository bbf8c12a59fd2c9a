//! Domain model and pure logic for the storefront quick-view flow:
//! products and variants, the shopper's selection, variant resolution,
//! bonus promotions, price formatting and configuration.

pub mod app_config;
pub mod config;
pub mod handle;
pub mod money;
pub mod products;
pub mod promotions;
pub mod resolver;
pub mod selection;

use thiserror::Error;

pub use app_config::{AppConfig, CatalogFormat};
pub use config::{load_app_config, load_app_config_from_env};
pub use handle::handleize;
pub use money::{MoneyFormat, PriceFormatter};
pub use products::{CartLineRequest, Product, ProductOption, Variant, VariantId};
pub use promotions::{
    load_promotions, parse_promotions, should_add_bonus, BonusProductRef, PromotionRule,
    PromotionRules,
};
pub use resolver::{resolve, resolve_id, ResolveError};
pub use selection::SelectionState;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    #[error("option position {position} out of range (product has {len} options)")]
    OptionPositionOutOfRange { position: usize, len: usize },

    #[error("unknown option: {0}")]
    UnknownOption(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid money format \"{format}\": {reason}")]
    InvalidMoneyFormat { format: String, reason: String },

    #[error("failed to read promotions file {path}: {source}")]
    PromotionsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse promotions file: {0}")]
    PromotionsFileParse(#[source] serde_yaml::Error),

    #[error("promotions validation failed: {0}")]
    Validation(String),
}

/// User-facing failure categories of the quick-view flow.
///
/// Every crate-level error maps onto one of these so the modal can decide
/// how to present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Product or catalog fetch failed or returned malformed data.
    Fetch,
    /// The complete selection matches no variant.
    NoVariantMatch,
    /// A required option has no value yet.
    MissingSelection,
    /// The cart service rejected the add or was unreachable.
    CartService,
    /// The bonus product could not be found or added. Never fatal.
    BonusLookup,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Fetch => write!(f, "fetch"),
            ErrorKind::NoVariantMatch => write!(f, "no_variant_match"),
            ErrorKind::MissingSelection => write!(f, "missing_selection"),
            ErrorKind::CartService => write!(f, "cart_service"),
            ErrorKind::BonusLookup => write!(f, "bonus_lookup"),
        }
    }
}

impl ResolveError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::MissingSelection { .. } => ErrorKind::MissingSelection,
            ResolveError::NoVariantMatch => ErrorKind::NoVariantMatch,
        }
    }
}
