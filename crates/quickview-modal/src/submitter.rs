//! Cart submission with best-effort bonus items.
//!
//! The primary line is authoritative: its outcome decides success. A bonus
//! line is only attempted after the primary add has been acknowledged, and
//! its failure is logged and reported but never undoes the primary add.

use std::sync::Arc;

use quickview_core::{
    BonusProductRef, CartLineRequest, ErrorKind, Product, PromotionRules, SelectionState,
    VariantId,
};
use quickview_storefront::{StorefrontClient, StorefrontError};
use thiserror::Error;

/// Outcome of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub primary_added: bool,
    pub bonus_added: bool,
    /// The primary failure, or a non-fatal bonus failure when
    /// `primary_added` is `true`.
    pub error: Option<SubmitFailure>,
}

impl SubmitResult {
    /// `true` when the primary line reached the cart, regardless of bonus.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.primary_added
    }

    fn primary_failed(err: &StorefrontError) -> Self {
        Self {
            primary_added: false,
            bonus_added: false,
            error: Some(SubmitFailure {
                kind: ErrorKind::CartService,
                message: err.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFailure {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Error)]
enum BonusError {
    #[error("bonus product '{0}' not found in catalog")]
    NotFound(String),

    #[error("bonus product '{handle}' is unusable: {reason}")]
    Unusable { handle: String, reason: String },

    #[error("bonus lookup failed: {0}")]
    Lookup(#[source] StorefrontError),

    #[error("bonus add rejected: {0}")]
    Add(#[source] StorefrontError),
}

impl BonusError {
    /// Catalog data that fails normalization is a bad bonus product, not a
    /// failed request.
    fn from_lookup(err: StorefrontError) -> Self {
        match err {
            StorefrontError::Normalization { handle, reason } => Self::Unusable { handle, reason },
            other => Self::Lookup(other),
        }
    }
}

/// Adds the chosen variant to the cart and applies promotions.
pub struct CartSubmitter {
    client: Arc<StorefrontClient>,
    promotions: PromotionRules,
}

impl CartSubmitter {
    #[must_use]
    pub fn new(client: Arc<StorefrontClient>, promotions: PromotionRules) -> Self {
        Self { client, promotions }
    }

    /// Adds `line`, then the bonus product of the first promotion matching
    /// `selection` (if any).
    ///
    /// Never returns an error: failures are described in the result.
    /// No step is retried.
    pub async fn submit(&self, line: CartLineRequest, selection: &SelectionState) -> SubmitResult {
        if let Err(err) = self.client.add_line(&line).await {
            tracing::warn!(
                variant_id = %line.variant_id(),
                quantity = line.quantity(),
                error = %err,
                "primary cart add failed"
            );
            return SubmitResult::primary_failed(&err);
        }
        tracing::info!(
            variant_id = %line.variant_id(),
            quantity = line.quantity(),
            "primary line added to cart"
        );

        let Some(rule) = self.promotions.evaluate(selection) else {
            return SubmitResult {
                primary_added: true,
                bonus_added: false,
                error: None,
            };
        };

        match self.add_bonus(&rule.bonus).await {
            Ok(bonus_variant) => {
                tracing::info!(
                    promotion = %rule.name,
                    bonus_variant = %bonus_variant,
                    "bonus line added to cart"
                );
                SubmitResult {
                    primary_added: true,
                    bonus_added: true,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    promotion = %rule.name,
                    bonus = rule.bonus.label(),
                    error = %err,
                    "bonus item not added; primary add stands"
                );
                SubmitResult {
                    primary_added: true,
                    bonus_added: false,
                    error: Some(SubmitFailure {
                        kind: ErrorKind::BonusLookup,
                        message: err.to_string(),
                    }),
                }
            }
        }
    }

    async fn add_bonus(&self, bonus: &BonusProductRef) -> Result<VariantId, BonusError> {
        let product = self.locate_bonus(bonus).await?;
        let variant = product
            .first_variant()
            .ok_or_else(|| BonusError::Unusable {
                handle: product.handle.clone(),
                reason: "product has no variants".to_owned(),
            })?;
        self.client
            .add_line(&CartLineRequest::single(variant.id))
            .await
            .map_err(BonusError::Add)?;
        Ok(variant.id)
    }

    /// Exact handle lookup first; the listing title scan when there is no
    /// handle or the handle 404s.
    async fn locate_bonus(&self, bonus: &BonusProductRef) -> Result<Product, BonusError> {
        if let Some(handle) = bonus.handle.as_deref() {
            match self.client.fetch_product_js(handle).await {
                Ok(product) => return Ok(product),
                Err(err) if err.is_not_found() && bonus.title.is_some() => {
                    tracing::debug!(handle, "bonus handle not found; scanning listing by title");
                }
                Err(err) if err.is_not_found() => {
                    return Err(BonusError::NotFound(handle.to_owned()));
                }
                Err(err) => return Err(BonusError::from_lookup(err)),
            }
        }

        let Some(title) = bonus.title.as_deref() else {
            return Err(BonusError::NotFound(bonus.label().to_owned()));
        };
        self.client
            .find_product_by_title(title)
            .await
            .map_err(BonusError::from_lookup)?
            .ok_or_else(|| BonusError::NotFound(title.to_owned()))
    }
}
