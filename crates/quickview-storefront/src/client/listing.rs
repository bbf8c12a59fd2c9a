//! The `products.json` listing and the title search built on it.

use quickview_core::Product;

use crate::error::StorefrontError;
use crate::normalize::normalize_json_product;
use crate::pagination::next_page_cursor;
use crate::types::ProductsListResponse;

use super::StorefrontClient;

/// Page size used for listing scans; the storefront maximum.
pub const LISTING_PAGE_LIMIT: u32 = 250;

/// Upper bound on listing pages, so a cycling cursor cannot loop forever.
pub(super) const MAX_PAGES: usize = 40;

impl StorefrontClient {
    /// Fetches one listing page and the raw `Link` header.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::RateLimited`] / [`StorefrontError::NotFound`] /
    ///   [`StorefrontError::UnexpectedStatus`]: non-2xx response.
    /// - [`StorefrontError::Http`]: network or TLS failure.
    /// - [`StorefrontError::Deserialize`]: body is not a product listing.
    pub async fn fetch_products_page(
        &self,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<(ProductsListResponse, Option<String>), StorefrontError> {
        let mut url = self.endpoint("products.json")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        if let Some(cursor) = page_info {
            url.query_pairs_mut().append_pair("page_info", cursor);
        }

        let (body, link_header) = self.get_text(url).await?;
        let page = serde_json::from_str::<ProductsListResponse>(&body).map_err(|e| {
            StorefrontError::Deserialize {
                context: format!("products page from {}", self.store_origin()),
                source: e,
            }
        })?;
        Ok((page, link_header))
    }

    /// Scans the listing for the first product whose title contains
    /// `fragment` (case-insensitive) and normalizes it.
    ///
    /// Follows `rel="next"` cursors and stops at the first match. Returns
    /// `Ok(None)` when the listing is exhausted without a match.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`] and from
    /// normalizing the matched product. Returns
    /// [`StorefrontError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn find_product_by_title(
        &self,
        fragment: &str,
    ) -> Result<Option<Product>, StorefrontError> {
        let needle = fragment.to_lowercase();
        let mut cursor: Option<String> = None;

        for page_number in 1..=MAX_PAGES {
            let (page, link_header) = self
                .fetch_products_page(LISTING_PAGE_LIMIT, cursor.as_deref())
                .await?;

            let scanned = page.products.len();
            if let Some(raw) = page
                .products
                .into_iter()
                .find(|p| p.title.to_lowercase().contains(&needle))
            {
                tracing::debug!(fragment, handle = %raw.handle, page_number, "title match in listing");
                return normalize_json_product(raw).map(Some);
            }

            tracing::debug!(fragment, page_number, scanned, "no title match on listing page");
            cursor = next_page_cursor(link_header.as_deref());
            if cursor.is_none() {
                return Ok(None);
            }
        }

        Err(StorefrontError::PaginationLimit {
            store_url: self.store_origin().to_owned(),
            max_pages: MAX_PAGES,
        })
    }
}
