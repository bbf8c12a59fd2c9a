//! Variant resolution: selection → concrete purchasable variant.
//!
//! Matching is positional and case-insensitive. When a catalog carries two
//! variants with the same option tuple, the first in catalog order wins.

use thiserror::Error;

use crate::products::{Variant, VariantId};
use crate::selection::SelectionState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// One or more options have no chosen value.
    #[error("please select {}", .options.join(", "))]
    MissingSelection { options: Vec<String> },

    /// Every option is chosen but no variant carries that combination.
    #[error("this combination is not available")]
    NoVariantMatch,
}

/// Returns the first variant whose option tuple equals the selection.
///
/// # Errors
///
/// - [`ResolveError::MissingSelection`] if any slot of `selection` is unset.
/// - [`ResolveError::NoVariantMatch`] if no variant matches.
pub fn resolve<'a>(
    selection: &SelectionState,
    variants: &'a [Variant],
) -> Result<&'a Variant, ResolveError> {
    let Some(chosen) = selection.values() else {
        return Err(ResolveError::MissingSelection {
            options: selection.missing(),
        });
    };

    let chosen: Vec<String> = chosen.iter().map(|v| v.to_lowercase()).collect();

    variants
        .iter()
        .find(|variant| {
            variant.options.len() == chosen.len()
                && variant
                    .options
                    .iter()
                    .zip(&chosen)
                    .all(|(have, want)| have.to_lowercase() == *want)
        })
        .ok_or(ResolveError::NoVariantMatch)
}

/// Like [`resolve`] but yields only the variant ID.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_id(
    selection: &SelectionState,
    variants: &[Variant],
) -> Result<VariantId, ResolveError> {
    resolve(selection, variants).map(|v| v.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tee_product;

    fn select(color: Option<&str>, size: Option<&str>) -> SelectionState {
        let product = tee_product();
        let mut state = SelectionState::empty(&product);
        if let Some(c) = color {
            state.set(0, c).unwrap();
        }
        if let Some(s) = size {
            state.set(1, s).unwrap();
        }
        state
    }

    #[test]
    fn black_medium_resolves_to_v2() {
        let product = tee_product();
        let id = resolve_id(&select(Some("Black"), Some("Medium")), &product.variants).unwrap();
        assert_eq!(id, VariantId(2));
    }

    #[test]
    fn white_medium_resolves_to_v4() {
        let product = tee_product();
        let id = resolve_id(&select(Some("White"), Some("Medium")), &product.variants).unwrap();
        assert_eq!(id, VariantId(4));
    }

    #[test]
    fn every_variant_tuple_resolves_to_itself_in_any_case() {
        let product = tee_product();
        for variant in &product.variants {
            let upper = select(
                Some(&variant.options[0].to_uppercase()),
                Some(&variant.options[1].to_lowercase()),
            );
            assert_eq!(resolve_id(&upper, &product.variants), Ok(variant.id));
        }
    }

    #[test]
    fn partial_selection_is_missing_not_guessed() {
        let product = tee_product();
        let err = resolve(&select(Some("Black"), None), &product.variants).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MissingSelection {
                options: vec!["Size".to_owned()]
            }
        );
        assert_eq!(err.to_string(), "please select Size");
    }

    #[test]
    fn unknown_value_has_no_match() {
        let product = tee_product();
        let err = resolve(&select(Some("Red"), Some("Medium")), &product.variants).unwrap_err();
        assert_eq!(err, ResolveError::NoVariantMatch);
    }

    #[test]
    fn duplicate_tuples_pick_first_in_catalog_order() {
        let mut product = tee_product();
        let mut dup = product.variants[1].clone();
        dup.id = VariantId(99);
        product.variants.push(dup);
        let id = resolve_id(&select(Some("black"), Some("medium")), &product.variants).unwrap();
        assert_eq!(id, VariantId(2));
    }

    #[test]
    fn variant_with_short_tuple_never_matches() {
        let mut product = tee_product();
        for v in &mut product.variants {
            v.options.truncate(1);
        }
        let err = resolve(&select(Some("Black"), Some("Small")), &product.variants).unwrap_err();
        assert_eq!(err, ResolveError::NoVariantMatch);
    }
}
