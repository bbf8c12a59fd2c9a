//! Quick-view modal state machine.
//!
//! ```text
//! Closed ──open──▶ Loading ──ok──▶ Ready ──submit──▶ Submitting ──added──▶ Closed
//!                     │                ▲                  │
//!                     └──err──▶ Error  └──────failed──────┘
//! ```
//!
//! Every `open` and `close` starts a new generation. Network completions
//! carry the generation they started in and are dropped if it is no longer
//! current, so a late response never repaints a closed or reopened modal.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use quickview_core::{
    resolve, AppConfig, CartLineRequest, CatalogFormat, ConfigError, CoreError, ErrorKind,
    MoneyFormat, PriceFormatter, Product, PromotionRules, ResolveError, SelectionState, VariantId,
};
use quickview_storefront::StorefrontClient;
use thiserror::Error;

use crate::submitter::{CartSubmitter, SubmitResult};
use crate::view::{CloseReason, ModalView, UserMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Loading,
    Ready,
    Submitting,
    Error,
}

impl std::fmt::Display for ModalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModalState::Closed => write!(f, "closed"),
            ModalState::Loading => write!(f, "loading"),
            ModalState::Ready => write!(f, "ready"),
            ModalState::Submitting => write!(f, "submitting"),
            ModalState::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ModalError {
    #[error("modal is {state}, expected ready")]
    NotReady { state: ModalState },

    #[error(transparent)]
    Selection(#[from] CoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Ready,
    Failed(String),
    /// The modal was closed or reopened before the product arrived.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The primary line was added and the modal closed.
    Added(SubmitResult),
    /// The primary add failed; the modal is ready for another try.
    Failed(SubmitResult),
    /// Nothing was sent: the selection is incomplete or unavailable.
    Blocked(ErrorKind),
    /// A submit is already in flight; this click was ignored.
    AlreadySubmitting,
    NotReady(ModalState),
    /// The modal was closed or reopened while the request was in flight.
    Discarded(SubmitResult),
}

/// Everything the controller needs besides the client and the view.
pub struct ModalOptions {
    pub catalog_format: CatalogFormat,
    pub auto_close_delay: Duration,
    pub promotions: PromotionRules,
    pub formatter: Arc<dyn PriceFormatter>,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            catalog_format: CatalogFormat::Js,
            auto_close_delay: Duration::from_millis(1500),
            promotions: PromotionRules::default(),
            formatter: Arc::new(MoneyFormat::default()),
        }
    }
}

impl ModalOptions {
    /// Builds options from configuration, loading the promotions file when
    /// one is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid money format or promotions file.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let promotions = match &config.promotions_path {
            Some(path) => quickview_core::load_promotions(path)?,
            None => PromotionRules::default(),
        };
        Ok(Self {
            catalog_format: config.catalog_format,
            auto_close_delay: config.auto_close_delay,
            promotions,
            formatter: Arc::new(MoneyFormat::parse(&config.money_format)?),
        })
    }
}

/// Per-open-cycle state. Reset on every open and close.
struct Session {
    generation: u64,
    state: ModalState,
    product: Option<Product>,
    selection: Option<SelectionState>,
    active_variant: Option<VariantId>,
    displayed_price: i64,
    quantity: u32,
}

impl Session {
    fn closed() -> Self {
        Self {
            generation: 0,
            state: ModalState::Closed,
            product: None,
            selection: None,
            active_variant: None,
            displayed_price: 0,
            quantity: 1,
        }
    }

    /// Starts a new cycle in `state`, dropping everything from the old one.
    fn restart(&mut self, state: ModalState) -> u64 {
        self.generation += 1;
        self.state = state;
        self.product = None;
        self.selection = None;
        self.active_variant = None;
        self.displayed_price = 0;
        self.quantity = 1;
        self.generation
    }

    fn require_ready(&self) -> Result<(), ModalError> {
        if self.state == ModalState::Ready {
            Ok(())
        } else {
            Err(ModalError::NotReady { state: self.state })
        }
    }
}

pub struct ModalController<V: ModalView> {
    client: Arc<StorefrontClient>,
    submitter: CartSubmitter,
    view: V,
    formatter: Arc<dyn PriceFormatter>,
    catalog_format: CatalogFormat,
    auto_close_delay: Duration,
    session: Mutex<Session>,
}

impl<V: ModalView> ModalController<V> {
    #[must_use]
    pub fn new(client: Arc<StorefrontClient>, view: V, options: ModalOptions) -> Self {
        Self {
            submitter: CartSubmitter::new(Arc::clone(&client), options.promotions),
            client,
            view,
            formatter: options.formatter,
            catalog_format: options.catalog_format,
            auto_close_delay: options.auto_close_delay,
            session: Mutex::new(Session::closed()),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> ModalState {
        self.session().state
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.session().quantity
    }

    /// The variant the current selection resolves to, if any.
    #[must_use]
    pub fn active_variant(&self) -> Option<VariantId> {
        self.session().active_variant
    }

    /// The price currently shown, in minor units.
    #[must_use]
    pub fn displayed_price(&self) -> i64 {
        self.session().displayed_price
    }

    #[must_use]
    pub fn selection(&self) -> Option<SelectionState> {
        self.session().selection.clone()
    }

    #[must_use]
    pub fn product(&self) -> Option<Product> {
        self.session().product.clone()
    }

    /// Shows the modal for `handle` and loads the product.
    ///
    /// Any earlier cycle is abandoned, including an in-flight submit.
    pub async fn open(&self, handle: &str) -> OpenOutcome {
        let generation = {
            let mut session = self.session();
            let generation = session.restart(ModalState::Loading);
            self.view.show_loading(handle);
            generation
        };
        tracing::debug!(handle, generation, "modal loading");

        let fetched = self.client.fetch_product(handle, self.catalog_format).await;

        let mut session = self.session();
        if session.generation != generation {
            tracing::warn!(handle, generation, "discarding product response for a stale modal");
            return OpenOutcome::Discarded;
        }

        match fetched {
            Ok(product) => {
                let selection = SelectionState::defaulted(&product);
                let resolved = resolve(&selection, &product.variants).ok();
                session.active_variant = resolved.map(|v| v.id);
                session.displayed_price = resolved.map_or(product.price, |v| v.price);
                session.state = ModalState::Ready;

                let price = self.formatter.format(session.displayed_price);
                self.view
                    .show_product(&product, &selection, &price, session.quantity);
                tracing::info!(
                    handle,
                    product_id = product.id,
                    variants = product.variants.len(),
                    "modal ready"
                );

                session.product = Some(product);
                session.selection = Some(selection);
                OpenOutcome::Ready
            }
            Err(err) => {
                tracing::warn!(handle, error = %err, kind = %ErrorKind::Fetch, "product load failed");
                session.state = ModalState::Error;
                self.view.show_error("Error loading product");
                OpenOutcome::Failed(err.to_string())
            }
        }
    }

    /// Sets the option at `position` and re-resolves the active variant.
    ///
    /// The displayed price follows the resolved variant; when the selection
    /// resolves to nothing the previous price stays.
    ///
    /// # Errors
    ///
    /// - [`ModalError::NotReady`] outside the `Ready` state.
    /// - [`ModalError::Selection`] when `position` is out of range.
    pub fn select_option(
        &self,
        position: usize,
        value: &str,
    ) -> Result<Option<VariantId>, ModalError> {
        let mut session = self.session();
        session.require_ready()?;
        let Session {
            product, selection, ..
        } = &mut *session;
        let (Some(product), Some(selection)) = (product.as_ref(), selection.as_mut()) else {
            return Ok(None);
        };
        selection.set(position, value)?;
        let resolved = resolve(selection, &product.variants).ok().map(|v| (v.id, v.price));
        Ok(self.apply_resolution(&mut session, resolved))
    }

    /// Like [`Self::select_option`] but addresses the option by name.
    ///
    /// # Errors
    ///
    /// - [`ModalError::NotReady`] outside the `Ready` state.
    /// - [`ModalError::Selection`] when no option has that name.
    pub fn select_option_by_name(
        &self,
        name: &str,
        value: &str,
    ) -> Result<Option<VariantId>, ModalError> {
        let position = {
            let session = self.session();
            session.require_ready()?;
            session
                .product
                .as_ref()
                .and_then(|p| p.option_position(name))
                .ok_or_else(|| CoreError::UnknownOption(name.to_owned()))?
        };
        self.select_option(position, value)
    }

    /// Resets the option at `position` to its placeholder. The selection is
    /// incomplete afterwards, so no variant is active.
    ///
    /// # Errors
    ///
    /// [`ModalError::NotReady`] outside the `Ready` state.
    pub fn clear_option(&self, position: usize) -> Result<(), ModalError> {
        let mut session = self.session();
        session.require_ready()?;
        if let Some(selection) = session.selection.as_mut() {
            selection.clear(position);
        }
        session.active_variant = None;
        Ok(())
    }

    fn apply_resolution(
        &self,
        session: &mut Session,
        resolved: Option<(VariantId, i64)>,
    ) -> Option<VariantId> {
        match resolved {
            Some((id, price)) => {
                session.active_variant = Some(id);
                if session.displayed_price != price {
                    session.displayed_price = price;
                    self.view.update_price(&self.formatter.format(price));
                }
                Some(id)
            }
            None => {
                session.active_variant = None;
                None
            }
        }
    }

    /// # Errors
    ///
    /// [`ModalError::NotReady`] outside the `Ready` state.
    pub fn increment_quantity(&self) -> Result<u32, ModalError> {
        self.change_quantity(|q| q.saturating_add(1))
    }

    /// Decrements the quantity, never below 1.
    ///
    /// # Errors
    ///
    /// [`ModalError::NotReady`] outside the `Ready` state.
    pub fn decrement_quantity(&self) -> Result<u32, ModalError> {
        self.change_quantity(|q| q.saturating_sub(1))
    }

    /// Sets the quantity directly (typed input), clamped to at least 1.
    ///
    /// # Errors
    ///
    /// [`ModalError::NotReady`] outside the `Ready` state.
    pub fn set_quantity(&self, quantity: u32) -> Result<u32, ModalError> {
        self.change_quantity(|_| quantity)
    }

    fn change_quantity(&self, f: impl FnOnce(u32) -> u32) -> Result<u32, ModalError> {
        let mut session = self.session();
        session.require_ready()?;
        let next = f(session.quantity).max(1);
        if next != session.quantity {
            session.quantity = next;
            self.view.update_quantity(next);
        }
        Ok(next)
    }

    /// Adds the resolved variant to the cart.
    ///
    /// A second call while one is in flight is ignored. On success the
    /// modal closes itself after the configured delay unless the shopper
    /// closed or reopened it first.
    pub async fn submit(&self) -> SubmitOutcome {
        let (generation, line, selection) = {
            let mut session = self.session();
            match session.state {
                ModalState::Ready => {}
                ModalState::Submitting => {
                    tracing::debug!("submit ignored; already submitting");
                    return SubmitOutcome::AlreadySubmitting;
                }
                other => return SubmitOutcome::NotReady(other),
            }

            let (Some(product), Some(selection)) = (&session.product, &session.selection) else {
                return SubmitOutcome::NotReady(session.state);
            };

            let variant_id = match resolve(selection, &product.variants) {
                Ok(variant) => variant.id,
                Err(err) => {
                    let message = match &err {
                        ResolveError::MissingSelection { options } => {
                            UserMessage::SelectOptions(options.clone())
                        }
                        ResolveError::NoVariantMatch => UserMessage::Unavailable,
                    };
                    tracing::debug!(error = %err, "submit blocked");
                    self.view.notify(&message);
                    return SubmitOutcome::Blocked(err.kind());
                }
            };

            let line = CartLineRequest::new(variant_id, session.quantity)
                .unwrap_or_else(|_| CartLineRequest::single(variant_id));
            let selection = selection.clone();
            session.state = ModalState::Submitting;
            self.view.set_submitting(true);
            (session.generation, line, selection)
        };

        let result = self.submitter.submit(line, &selection).await;

        {
            let mut session = self.session();
            if session.generation != generation {
                tracing::warn!(
                    generation,
                    primary_added = result.primary_added,
                    "discarding cart response for a stale modal"
                );
                return SubmitOutcome::Discarded(result);
            }

            if !result.primary_added {
                session.state = ModalState::Ready;
                self.view.set_submitting(false);
                let detail = result
                    .error
                    .as_ref()
                    .map(|e| e.message.clone())
                    .unwrap_or_default();
                self.view.notify(&UserMessage::AddFailed(detail));
                return SubmitOutcome::Failed(result);
            }

            self.view.notify(&UserMessage::Added);
        }

        if !self.auto_close_delay.is_zero() {
            tokio::time::sleep(self.auto_close_delay).await;
        }

        let mut session = self.session();
        if session.generation == generation && session.state == ModalState::Submitting {
            self.close_locked(&mut session, CloseReason::AutoClose);
        }
        SubmitOutcome::Added(result)
    }

    /// Hides the modal. Returns `false` if it was already closed.
    ///
    /// An in-flight submit is not cancelled; its response is discarded.
    pub fn close(&self, reason: CloseReason) -> bool {
        let mut session = self.session();
        if session.state == ModalState::Closed {
            return false;
        }
        self.close_locked(&mut session, reason);
        true
    }

    fn close_locked(&self, session: &mut Session, reason: CloseReason) {
        let from = session.state;
        session.restart(ModalState::Closed);
        self.view.hide();
        tracing::debug!(?reason, %from, "modal closed");
    }
}
