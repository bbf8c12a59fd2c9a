//! `POST /cart/add.js`.

use quickview_core::CartLineRequest;

use crate::error::StorefrontError;
use crate::types::{CartAddItem, CartAddRequest, CartAddResponse, CartErrorBody};

use super::{check_status, StorefrontClient};

impl StorefrontClient {
    /// Adds one line to the shopper's cart.
    ///
    /// # Errors
    ///
    /// See [`Self::add_lines`].
    pub async fn add_line(&self, line: &CartLineRequest) -> Result<CartAddResponse, StorefrontError> {
        self.add_lines(std::slice::from_ref(line)).await
    }

    /// Adds `lines` to the cart in a single request.
    ///
    /// Any 2xx with a JSON body is success.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::CartRejected`]: 4xx/5xx with a storefront error
    ///   body (sold out, quantity limit, ...).
    /// - [`StorefrontError::RateLimited`] / [`StorefrontError::NotFound`] /
    ///   [`StorefrontError::UnexpectedStatus`]: other non-2xx responses.
    /// - [`StorefrontError::Http`]: the cart service is unreachable.
    /// - [`StorefrontError::Deserialize`]: 2xx whose body is not JSON.
    pub async fn add_lines(
        &self,
        lines: &[CartLineRequest],
    ) -> Result<CartAddResponse, StorefrontError> {
        let url = self.endpoint("cart/add.js")?;
        let body = CartAddRequest {
            items: lines
                .iter()
                .map(|line| CartAddItem {
                    id: line.variant_id(),
                    quantity: line.quantity(),
                })
                .collect(),
        };

        tracing::debug!(url = %url, lines = lines.len(), "cart add");
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success()
            && status != reqwest::StatusCode::TOO_MANY_REQUESTS
            && status != reqwest::StatusCode::NOT_FOUND
        {
            let text = response.text().await.unwrap_or_default();
            return Err(rejection(status.as_u16(), &text, url.as_str()));
        }

        let response = check_status(response, url.as_str())?;
        let text = response.text().await?;
        serde_json::from_str::<CartAddResponse>(&text).map_err(|e| StorefrontError::Deserialize {
            context: "cart add response".to_owned(),
            source: e,
        })
    }
}

/// Prefers the storefront's own explanation of a rejected add; falls back
/// to the bare status when the body carries none.
fn rejection(status: u16, body: &str, url: &str) -> StorefrontError {
    serde_json::from_str::<CartErrorBody>(body)
        .ok()
        .and_then(|err| err.description.or(err.message))
        .map_or_else(
            || StorefrontError::UnexpectedStatus {
                status,
                url: url.to_owned(),
            },
            |description| StorefrontError::CartRejected {
                status,
                description,
            },
        )
}
