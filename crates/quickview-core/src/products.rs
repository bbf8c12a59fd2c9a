use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Storefront numeric variant ID, e.g. `39872345112345`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub u64);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VariantId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A product as shown in the quick-view modal, normalized from either
/// catalog shape (`/products/{handle}.json` or `/products/{handle}.js`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Storefront numeric product ID.
    pub id: u64,
    /// URL slug, e.g. `"soft-winter-jacket"`.
    pub handle: String,
    pub title: String,
    /// Raw HTML description. `None` when the catalog sends null or an empty string.
    pub description: Option<String>,
    /// Featured image URL, if any.
    pub image_url: Option<String>,
    /// Display price in minor units (cents). Taken from the catalog's
    /// product-level price, or the first variant's price when absent.
    pub price: i64,
    /// Options ordered by position; `options[i].position == i`.
    pub options: Vec<ProductOption>,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Returns the first variant in catalog order, which seeds the initial
    /// selection when the modal opens.
    #[must_use]
    pub fn first_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }

    /// Returns the 0-based position of the option named `name`
    /// (case-insensitive), if the product has one.
    #[must_use]
    pub fn option_position(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.name.to_lowercase() == name.to_lowercase())
    }
}

/// A named axis of choice such as `"Color"` or `"Size"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    /// Allowed values in display order.
    pub values: Vec<String>,
    /// 0-based slot index. The catalog reports 1-based positions; parsers
    /// subtract one so this lines up with [`Variant::options`].
    pub position: usize,
}

/// One purchasable combination of option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    /// Display title, e.g. `"Black / Medium"`.
    pub title: String,
    /// Price in minor units (cents).
    pub price: i64,
    pub available: bool,
    /// Option values in slot order: `options[0]` belongs to the first
    /// [`ProductOption`], `options[1]` to the second, and so on.
    pub options: Vec<String>,
}

/// A single cart line: a variant and a positive quantity.
///
/// Fields are private so a constructed line cannot be altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLineRequest {
    variant_id: VariantId,
    quantity: NonZeroU32,
}

impl CartLineRequest {
    /// Builds a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQuantity`] when `quantity` is zero.
    pub fn new(variant_id: VariantId, quantity: u32) -> Result<Self, CoreError> {
        let quantity = NonZeroU32::new(quantity).ok_or(CoreError::InvalidQuantity(quantity))?;
        Ok(Self {
            variant_id,
            quantity,
        })
    }

    /// A line with quantity one, as used for bonus items.
    #[must_use]
    pub fn single(variant_id: VariantId) -> Self {
        Self {
            variant_id,
            quantity: NonZeroU32::MIN,
        }
    }

    #[must_use]
    pub fn variant_id(&self) -> VariantId {
        self.variant_id
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: 1,
            handle: "classic-tee".to_owned(),
            title: "Classic Tee".to_owned(),
            description: None,
            image_url: None,
            price: 2500,
            options: vec![
                ProductOption {
                    name: "Color".to_owned(),
                    values: vec!["Black".to_owned(), "White".to_owned()],
                    position: 0,
                },
                ProductOption {
                    name: "Size".to_owned(),
                    values: vec!["Small".to_owned(), "Medium".to_owned()],
                    position: 1,
                },
            ],
            variants: vec![Variant {
                id: VariantId(11),
                title: "Black / Small".to_owned(),
                price: 2500,
                available: true,
                options: vec!["Black".to_owned(), "Small".to_owned()],
            }],
        }
    }

    #[test]
    fn cart_line_rejects_zero_quantity() {
        let err = CartLineRequest::new(VariantId(1), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity(0)));
    }

    #[test]
    fn cart_line_keeps_quantity() {
        let line = CartLineRequest::new(VariantId(7), 3).unwrap();
        assert_eq!(line.variant_id(), VariantId(7));
        assert_eq!(line.quantity(), 3);
        assert_eq!(CartLineRequest::single(VariantId(7)).quantity(), 1);
    }

    #[test]
    fn option_position_is_case_insensitive() {
        let p = product();
        assert_eq!(p.option_position("size"), Some(1));
        assert_eq!(p.option_position("COLOR"), Some(0));
        assert_eq!(p.option_position("Material"), None);
    }

    #[test]
    fn variant_id_serializes_as_number() {
        let json = serde_json::to_string(&VariantId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
