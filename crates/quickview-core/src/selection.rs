//! The shopper's current option choices for one open modal.

use crate::products::Product;
use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    name: String,
    value: Option<String>,
}

/// Mapping from option position to the chosen value.
///
/// One slot exists per product option, in position order. A slot may be
/// unset; [`crate::resolver::resolve`] refuses to pick a variant until every
/// slot has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    slots: Vec<Slot>,
}

impl SelectionState {
    /// An empty selection with one unset slot per option of `product`.
    #[must_use]
    pub fn empty(product: &Product) -> Self {
        Self {
            slots: product
                .options
                .iter()
                .map(|o| Slot {
                    name: o.name.clone(),
                    value: None,
                })
                .collect(),
        }
    }

    /// The selection a freshly opened modal starts with: the first variant's
    /// option tuple. Falls back to an empty selection when the product has no
    /// variants.
    #[must_use]
    pub fn defaulted(product: &Product) -> Self {
        let mut state = Self::empty(product);
        if let Some(first) = product.first_variant() {
            for (slot, value) in state.slots.iter_mut().zip(&first.options) {
                slot.value = Some(value.clone());
            }
        }
        state
    }

    /// Builds a selection from `(option name, value)` pairs, matching names
    /// case-insensitively against the product's options. Options not named
    /// stay unset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownOption`] when a name matches no option.
    pub fn from_pairs<'a, I>(product: &Product, pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = Self::empty(product);
        for (name, value) in pairs {
            state.set_by_name(name, value)?;
        }
        Ok(state)
    }

    /// Sets the value at `position`. A blank value is the "choose one"
    /// placeholder and leaves the slot unset.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OptionPositionOutOfRange`] when `position` has no slot.
    pub fn set(&mut self, position: usize, value: impl Into<String>) -> Result<(), CoreError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(CoreError::OptionPositionOutOfRange { position, len })?;
        slot.value = chosen_value(value.into());
        Ok(())
    }

    /// Sets the value of the option called `name` (case-insensitive).
    /// Blank values unset the slot, as in [`Self::set`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownOption`] when no slot has that name.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let wanted = name.to_lowercase();
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.name.to_lowercase() == wanted)
            .ok_or_else(|| CoreError::UnknownOption(name.to_owned()))?;
        slot.value = chosen_value(value.into());
        Ok(())
    }

    /// Clears the value at `position`, if the slot exists.
    pub fn clear(&mut self, position: usize) {
        if let Some(slot) = self.slots.get_mut(position) {
            slot.value = None;
        }
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.slots.get(position)?.value.as_deref()
    }

    /// Value of the option called `name` (case-insensitive).
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.slots
            .iter()
            .find(|s| s.name.to_lowercase() == wanted)?
            .value
            .as_deref()
    }

    /// Number of slots (equal to the product's option count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.value.is_some())
    }

    /// Names of options that still have no value, in position order.
    #[must_use]
    pub fn missing(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| s.value.is_none())
            .map(|s| s.name.clone())
            .collect()
    }

    /// All chosen values in position order, or `None` if any slot is unset.
    #[must_use]
    pub fn values(&self) -> Option<Vec<&str>> {
        self.slots.iter().map(|s| s.value.as_deref()).collect()
    }

    /// Iterates `(option name, value)` over the slots that have a value.
    pub fn chosen(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .filter_map(|s| s.value.as_deref().map(|v| (s.name.as_str(), v)))
    }
}

fn chosen_value(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
