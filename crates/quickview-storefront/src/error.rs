use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("cart rejected the request (HTTP {status}): {description}")]
    CartRejected { status: u16, description: String },

    #[error("normalization error for product {handle}: {reason}")]
    Normalization { handle: String, reason: String },

    #[error("pagination limit reached for {store_url}: exceeded {max_pages} pages")]
    PaginationLimit { store_url: String, max_pages: usize },

    #[error("invalid store URL \"{store_url}\": {reason}")]
    InvalidStoreUrl { store_url: String, reason: String },
}

impl StorefrontError {
    /// `true` for a 404 from the storefront, which callers treat as
    /// "no such product" rather than a transport failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorefrontError::NotFound { .. })
    }
}
