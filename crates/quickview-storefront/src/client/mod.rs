//! HTTP client for the storefront's public catalog and cart endpoints.

mod cart;
mod listing;
mod origin;

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use quickview_core::{CatalogFormat, Product};
use reqwest::{Client, Response, Url};

use crate::error::StorefrontError;
use crate::normalize::{normalize_js_product, normalize_json_product};
use crate::types::{JsProduct, ProductJsonEnvelope};

pub use origin::extract_store_origin;
#[cfg(test)]
use origin::extract_domain;

/// Characters escaped when a handle is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Client for one storefront.
///
/// Maps 429, 404 and other non-2xx responses to typed errors. Nothing is
/// retried: every failure is returned to the caller, which decides whether
/// the shopper should try again.
pub struct StorefrontClient {
    pub(super) client: Client,
    /// Store origin with a trailing slash; all endpoint paths join onto it.
    pub(super) base_url: Url,
}

impl StorefrontClient {
    /// Creates a client for the store at `store_url`. Any path on the URL is
    /// dropped; requests always go to the store root.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Http`] if the `reqwest::Client` cannot be built.
    /// - [`StorefrontError::InvalidStoreUrl`] if the origin is not a valid URL.
    pub fn new(store_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, StorefrontError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let origin = extract_store_origin(store_url);
        let base_url =
            Url::parse(&format!("{origin}/")).map_err(|e| StorefrontError::InvalidStoreUrl {
                store_url: store_url.to_owned(),
                reason: format!("origin \"{origin}\" is not a valid URL base: {e}"),
            })?;

        Ok(Self { client, base_url })
    }

    /// The store origin requests are sent to, without a trailing slash.
    #[must_use]
    pub fn store_origin(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Fetches and normalizes one product in the requested layout.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_product_json`] and [`Self::fetch_product_js`].
    pub async fn fetch_product(
        &self,
        handle: &str,
        format: CatalogFormat,
    ) -> Result<Product, StorefrontError> {
        match format {
            CatalogFormat::Json => self.fetch_product_json(handle).await,
            CatalogFormat::Js => self.fetch_product_js(handle).await,
        }
    }

    /// Fetches `GET /products/{handle}.json`.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotFound`]: no product with that handle.
    /// - [`StorefrontError::RateLimited`] / [`StorefrontError::UnexpectedStatus`]: non-2xx.
    /// - [`StorefrontError::Http`]: network or TLS failure.
    /// - [`StorefrontError::Deserialize`]: body is not the expected JSON.
    /// - [`StorefrontError::Normalization`]: product data is unusable.
    pub async fn fetch_product_json(&self, handle: &str) -> Result<Product, StorefrontError> {
        let url = self.product_url(handle, "json")?;
        let (body, _) = self.get_text(url).await?;
        let envelope: ProductJsonEnvelope =
            serde_json::from_str(&body).map_err(|e| StorefrontError::Deserialize {
                context: format!("product {handle}.json"),
                source: e,
            })?;
        normalize_json_product(envelope.product)
    }

    /// Fetches `GET /products/{handle}.js`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_product_json`].
    pub async fn fetch_product_js(&self, handle: &str) -> Result<Product, StorefrontError> {
        let url = self.product_url(handle, "js")?;
        let (body, _) = self.get_text(url).await?;
        let product: JsProduct =
            serde_json::from_str(&body).map_err(|e| StorefrontError::Deserialize {
                context: format!("product {handle}.js"),
                source: e,
            })?;
        normalize_js_product(product)
    }

    /// Builds `/products/{handle}.{ext}` with the handle percent-encoded.
    fn product_url(&self, handle: &str, ext: &str) -> Result<Url, StorefrontError> {
        let encoded = utf8_percent_encode(handle, PATH_SEGMENT);
        self.endpoint(&format!("products/{encoded}.{ext}"))
    }

    pub(super) fn endpoint(&self, path: &str) -> Result<Url, StorefrontError> {
        self.base_url
            .join(path)
            .map_err(|e| StorefrontError::InvalidStoreUrl {
                store_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }

    /// GETs `url` and returns the body text plus the raw `Link` header.
    pub(super) async fn get_text(
        &self,
        url: Url,
    ) -> Result<(String, Option<String>), StorefrontError> {
        tracing::debug!(url = %url, "storefront GET");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(response, url.as_str())?;

        // Read the Link header before the body consumes the response.
        let link_header = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await?;
        Ok((body, link_header))
    }
}

/// Passes 2xx responses through and maps everything else to an error.
pub(super) fn check_status(response: Response, url: &str) -> Result<Response, StorefrontError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(StorefrontError::RateLimited {
            domain: origin::extract_domain(url),
            retry_after_secs,
        });
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(StorefrontError::NotFound {
            url: url.to_owned(),
        });
    }

    if !status.is_success() {
        return Err(StorefrontError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
