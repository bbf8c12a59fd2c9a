//! The surface a [`crate::ModalController`] renders into.
//!
//! The controller never reaches for global state; everything it shows goes
//! through the [`ModalView`] it was given. Calls are made while the
//! controller holds its session lock, so a view must not call back into the
//! controller from inside these methods.

use std::fmt;
use std::sync::Arc;

use quickview_core::{Product, SelectionState};

/// Why the modal was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    Backdrop,
    CloseButton,
    /// Fired by the controller after a successful add.
    AutoClose,
}

/// Short messages shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMessage {
    Added,
    AddFailed(String),
    /// Options that still need a value.
    SelectOptions(Vec<String>),
    Unavailable,
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserMessage::Added => write!(f, "Product added to cart!"),
            UserMessage::AddFailed(_) => write!(f, "Error adding product to cart"),
            UserMessage::SelectOptions(options) => {
                write!(f, "Please select a {}", options.join(" and ").to_lowercase())
            }
            UserMessage::Unavailable => write!(f, "This combination is not available"),
        }
    }
}

pub trait ModalView: Send + Sync {
    /// The modal became visible and a product is being fetched.
    fn show_loading(&self, handle: &str);

    /// Product details are ready to display.
    fn show_product(&self, product: &Product, selection: &SelectionState, price: &str, quantity: u32);

    /// The product could not be loaded; the modal stays open.
    fn show_error(&self, message: &str);

    fn update_price(&self, price: &str);

    fn update_quantity(&self, quantity: u32);

    /// Disable or re-enable the add-to-cart control.
    fn set_submitting(&self, submitting: bool);

    fn notify(&self, message: &UserMessage);

    fn hide(&self);
}

impl<T: ModalView + ?Sized> ModalView for Arc<T> {
    fn show_loading(&self, handle: &str) {
        (**self).show_loading(handle);
    }

    fn show_product(&self, product: &Product, selection: &SelectionState, price: &str, quantity: u32) {
        (**self).show_product(product, selection, price, quantity);
    }

    fn show_error(&self, message: &str) {
        (**self).show_error(message);
    }

    fn update_price(&self, price: &str) {
        (**self).update_price(price);
    }

    fn update_quantity(&self, quantity: u32) {
        (**self).update_quantity(quantity);
    }

    fn set_submitting(&self, submitting: bool) {
        (**self).set_submitting(submitting);
    }

    fn notify(&self, message: &UserMessage) {
        (**self).notify(message);
    }

    fn hide(&self) {
        (**self).hide();
    }
}
