//! Quick-view modal: the open/select/submit/close lifecycle and the cart
//! submission that backs it.
//!
//! The controller is headless. Rendering goes through a [`ModalView`]
//! implementation supplied by the host.

pub mod controller;
pub mod submitter;
pub mod view;

pub use controller::{
    ModalController, ModalError, ModalOptions, ModalState, OpenOutcome, SubmitOutcome,
};
pub use submitter::{CartSubmitter, SubmitFailure, SubmitResult};
pub use view::{CloseReason, ModalView, UserMessage};
