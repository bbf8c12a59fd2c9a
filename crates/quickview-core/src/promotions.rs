//! Bonus-item promotions keyed on the shopper's option selection.
//!
//! A promotion is a set of `option = value` conditions plus a reference to
//! the product to add for free. Rules are evaluated in order and the first
//! match wins. The built-in rule set adds the "Soft Winter Jacket" when
//! Color is Black and Size is Medium; a YAML file can replace it.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::selection::SelectionState;
use crate::ConfigError;

/// Handle of the product added by the built-in promotion.
pub const DEFAULT_BONUS_HANDLE: &str = "soft-winter-jacket";
/// Title fragment used to find the built-in bonus product in the listing.
pub const DEFAULT_BONUS_TITLE: &str = "Soft Winter Jacket";

/// Where to find a bonus product in the catalog.
///
/// `handle` is tried first as an exact lookup; `title` is a case-insensitive
/// substring matched against the full product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusProductRef {
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl BonusProductRef {
    /// Human-readable label for logs: the handle, else the title.
    #[must_use]
    pub fn label(&self) -> &str {
        self.handle
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("<unnamed bonus>")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRule {
    pub name: String,
    /// Option name → required value, both compared case-insensitively.
    pub when: BTreeMap<String, String>,
    pub bonus: BonusProductRef,
}

impl PromotionRule {
    /// `true` when every condition is met by `selection`. An option the
    /// selection has no value for never satisfies a condition.
    #[must_use]
    pub fn matches(&self, selection: &SelectionState) -> bool {
        self.when.iter().all(|(option, wanted)| {
            selection
                .get_by_name(option)
                .is_some_and(|have| have.to_lowercase() == wanted.to_lowercase())
        })
    }
}

/// Ordered promotion rules; first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionRules {
    rules: Vec<PromotionRule>,
}

impl Default for PromotionRules {
    fn default() -> Self {
        Self {
            rules: vec![PromotionRule {
                name: "black-medium-winter-jacket".to_owned(),
                when: BTreeMap::from([
                    ("Color".to_owned(), "Black".to_owned()),
                    ("Size".to_owned(), "Medium".to_owned()),
                ]),
                bonus: BonusProductRef {
                    handle: Some(DEFAULT_BONUS_HANDLE.to_owned()),
                    title: Some(DEFAULT_BONUS_TITLE.to_owned()),
                },
            }],
        }
    }
}

impl PromotionRules {
    #[must_use]
    pub fn new(rules: Vec<PromotionRule>) -> Self {
        Self { rules }
    }

    /// A rule set that never adds anything.
    #[must_use]
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    /// Returns the first rule matching `selection`.
    #[must_use]
    pub fn evaluate(&self, selection: &SelectionState) -> Option<&PromotionRule> {
        self.rules.iter().find(|rule| rule.matches(selection))
    }

    #[must_use]
    pub fn rules(&self) -> &[PromotionRule] {
        &self.rules
    }
}

/// The built-in Black + Medium promotion check.
#[must_use]
pub fn should_add_bonus(selection: &SelectionState) -> bool {
    PromotionRules::default().evaluate(selection).is_some()
}

#[derive(Debug, Deserialize)]
struct PromotionsFile {
    promotions: Vec<PromotionRule>,
}

/// Load and validate promotion rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_promotions(path: &Path) -> Result<PromotionRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PromotionsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_promotions(&content)
}

/// Parse and validate promotion rules from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text is not valid YAML or fails validation.
pub fn parse_promotions(content: &str) -> Result<PromotionRules, ConfigError> {
    let file: PromotionsFile =
        serde_yaml::from_str(content).map_err(ConfigError::PromotionsFileParse)?;
    validate_promotions(&file.promotions)?;
    Ok(PromotionRules::new(file.promotions))
}

fn validate_promotions(rules: &[PromotionRule]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for rule in rules {
        if rule.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "promotion name must be non-empty".to_string(),
            ));
        }

        if rule.when.is_empty() {
            return Err(ConfigError::Validation(format!(
                "promotion '{}' has no conditions; it would match every selection",
                rule.name
            )));
        }

        let has_handle = rule.bonus.handle.as_deref().is_some_and(|h| !h.trim().is_empty());
        let has_title = rule.bonus.title.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_handle && !has_title {
            return Err(ConfigError::Validation(format!(
                "promotion '{}' bonus needs a handle or a title",
                rule.name
            )));
        }

        if !seen_names.insert(rule.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate promotion name: '{}'",
                rule.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "promotions_test.rs"]
mod tests;
