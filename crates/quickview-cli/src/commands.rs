//! Command handlers. Each one drives the modal controller through the same
//! sequence a shopper would: open, choose, submit, close.

use std::sync::Arc;

use quickview_core::AppConfig;
use quickview_modal::{CloseReason, ModalController, ModalOptions, OpenOutcome, SubmitOutcome};
use quickview_storefront::StorefrontClient;

use crate::view::TerminalView;

pub(crate) type Controller = ModalController<TerminalView>;

/// # Errors
///
/// Returns an error if the storefront client cannot be built or the money
/// format / promotions file in `config` is invalid.
pub(crate) fn build_controller(config: &AppConfig) -> anyhow::Result<Controller> {
    let client = StorefrontClient::new(
        &config.store_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build storefront client: {e}"))?;
    let options = ModalOptions::from_config(config)?;
    tracing::debug!(
        store = client.store_origin(),
        catalog_format = %config.catalog_format,
        rules = options.promotions.rules().len(),
        "controller ready"
    );
    Ok(ModalController::new(Arc::new(client), TerminalView, options))
}

fn ensure_ready(outcome: OpenOutcome, handle: &str) -> anyhow::Result<()> {
    match outcome {
        OpenOutcome::Ready => Ok(()),
        OpenOutcome::Failed(reason) => anyhow::bail!("could not load '{handle}': {reason}"),
        OpenOutcome::Discarded => anyhow::bail!("quick view for '{handle}' was closed while loading"),
    }
}

pub(crate) async fn run_show(controller: &Controller, handle: &str) -> anyhow::Result<()> {
    let outcome = controller.open(handle).await;
    controller.close(CloseReason::CloseButton);
    ensure_ready(outcome, handle)
}

/// Opens `handle`, applies `options` and `quantity`, then submits.
///
/// # Errors
///
/// Returns an error when the product fails to load, an option name is
/// unknown, the selection is incomplete or unavailable, or the cart
/// rejects the primary line. A failed bonus add is reported but is not an
/// error.
pub(crate) async fn run_add(
    controller: &Controller,
    handle: &str,
    options: &[(String, String)],
    quantity: u32,
) -> anyhow::Result<()> {
    ensure_ready(controller.open(handle).await, handle)?;

    for (name, value) in options {
        if let Err(e) = controller.select_option_by_name(name, value) {
            controller.close(CloseReason::Escape);
            return Err(e.into());
        }
    }
    controller.set_quantity(quantity)?;

    match controller.submit().await {
        SubmitOutcome::Added(result) => {
            if result.bonus_added {
                println!("Bonus item added to cart.");
            } else if let Some(failure) = result.error {
                println!("Bonus item could not be added ({}).", failure.kind);
                tracing::debug!(reason = %failure.message, "bonus detail");
            }
            Ok(())
        }
        SubmitOutcome::Failed(result) => {
            controller.close(CloseReason::CloseButton);
            let reason = result.error.map(|f| f.message).unwrap_or_default();
            anyhow::bail!("cart rejected '{handle}': {reason}")
        }
        SubmitOutcome::Blocked(kind) => {
            controller.close(CloseReason::Escape);
            anyhow::bail!("nothing added to cart ({kind})")
        }
        other => anyhow::bail!("unexpected submit outcome: {other:?}"),
    }
}
