//! Plain-text rendering of the quick view for the terminal.

use quickview_core::{Product, SelectionState};
use quickview_modal::{ModalView, UserMessage};

/// Writes modal output to stdout. Logs go to stderr, so stdout carries
/// only what a shopper would see.
pub(crate) struct TerminalView;

impl ModalView for TerminalView {
    fn show_loading(&self, handle: &str) {
        println!("Loading {handle}...");
    }

    fn show_product(&self, product: &Product, selection: &SelectionState, price: &str, quantity: u32) {
        println!();
        println!("{}  {price}", product.title);
        for option in &product.options {
            let chosen = selection.get(option.position);
            let values: Vec<String> = option
                .values
                .iter()
                .map(|v| {
                    if chosen.is_some_and(|c| c.eq_ignore_ascii_case(v)) {
                        format!("[{v}]")
                    } else {
                        v.clone()
                    }
                })
                .collect();
            println!("  {}: {}", option.name, values.join(" "));
        }
        let sold_out: Vec<&str> = product
            .variants
            .iter()
            .filter(|v| !v.available)
            .map(|v| v.title.as_str())
            .collect();
        if !sold_out.is_empty() {
            println!("  Sold out: {}", sold_out.join(", "));
        }
        println!("  Quantity: {quantity}");
    }

    fn show_error(&self, message: &str) {
        println!("{message}");
    }

    fn update_price(&self, price: &str) {
        println!("  Price: {price}");
    }

    fn update_quantity(&self, quantity: u32) {
        println!("  Quantity: {quantity}");
    }

    fn set_submitting(&self, submitting: bool) {
        if submitting {
            println!("Adding to cart...");
        }
    }

    fn notify(&self, message: &UserMessage) {
        println!("{message}");
    }

    fn hide(&self) {}
}
