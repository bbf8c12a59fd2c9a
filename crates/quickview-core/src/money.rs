//! Price display.
//!
//! Prices travel as integer minor units. Turning them into text is the job
//! of a [`PriceFormatter`] supplied by the caller; [`MoneyFormat`] implements
//! the storefront money-format strings (`"${{amount}}"`, `"{{amount_with_comma_separator}} €"`).

use crate::ConfigError;

/// Formats a minor-unit amount for display.
pub trait PriceFormatter: Send + Sync {
    fn format(&self, cents: i64) -> String;
}

impl<F> PriceFormatter for F
where
    F: Fn(i64) -> String + Send + Sync,
{
    fn format(&self, cents: i64) -> String {
        self(cents)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Amount,
    AmountNoDecimals,
    AmountWithCommaSeparator,
    AmountNoDecimalsWithCommaSeparator,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "amount" => Some(Self::Amount),
            "amount_no_decimals" => Some(Self::AmountNoDecimals),
            "amount_with_comma_separator" => Some(Self::AmountWithCommaSeparator),
            "amount_no_decimals_with_comma_separator" => {
                Some(Self::AmountNoDecimalsWithCommaSeparator)
            }
            _ => None,
        }
    }
}

/// A parsed storefront money format such as `"${{amount}}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    prefix: String,
    placeholder: Placeholder,
    suffix: String,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            prefix: "$".to_owned(),
            placeholder: Placeholder::Amount,
            suffix: String::new(),
        }
    }
}

impl MoneyFormat {
    /// Parses a format string containing exactly one `{{placeholder}}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMoneyFormat`] when the placeholder is
    /// missing or unknown.
    pub fn parse(format: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidMoneyFormat {
            format: format.to_owned(),
            reason: reason.to_owned(),
        };

        let start = format
            .find("{{")
            .ok_or_else(|| invalid("no {{placeholder}} found"))?;
        let end = format[start..]
            .find("}}")
            .map(|i| start + i)
            .ok_or_else(|| invalid("unterminated placeholder"))?;

        let name = &format[start + 2..end];
        let placeholder =
            Placeholder::parse(name).ok_or_else(|| invalid(&format!("unknown placeholder '{name}'")))?;

        Ok(Self {
            prefix: format[..start].to_owned(),
            placeholder,
            suffix: format[end + 2..].to_owned(),
        })
    }

    /// Renders `cents` with this format.
    #[must_use]
    pub fn render(&self, cents: i64) -> String {
        let amount = match self.placeholder {
            Placeholder::Amount => with_delimiters(cents, 2, ',', '.'),
            Placeholder::AmountNoDecimals => with_delimiters(cents, 0, ',', '.'),
            Placeholder::AmountWithCommaSeparator => with_delimiters(cents, 2, '.', ','),
            Placeholder::AmountNoDecimalsWithCommaSeparator => with_delimiters(cents, 0, '.', ','),
        };
        format!("{}{amount}{}", self.prefix, self.suffix)
    }
}

impl PriceFormatter for MoneyFormat {
    fn format(&self, cents: i64) -> String {
        self.render(cents)
    }
}

fn with_delimiters(cents: i64, precision: u32, thousands: char, decimal: char) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();

    let (units, fraction) = if precision == 0 {
        ((abs + 50) / 100, None)
    } else {
        (abs / 100, Some(abs % 100))
    };

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match fraction {
        Some(f) => format!("{sign}{grouped}{decimal}{f:02}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dollar_amount() {
        assert_eq!(MoneyFormat::default().render(2500), "$25.00");
    }

    #[test]
    fn amount_groups_thousands() {
        let f = MoneyFormat::parse("${{amount}}").unwrap();
        assert_eq!(f.render(113_465), "$1,134.65");
        assert_eq!(f.render(5), "$0.05");
        assert_eq!(f.render(0), "$0.00");
    }

    #[test]
    fn no_decimals_rounds() {
        let f = MoneyFormat::parse("${{ amount_no_decimals }}").unwrap();
        assert_eq!(f.render(113_465), "$1,135");
        assert_eq!(f.render(149), "$1");
    }

    #[test]
    fn comma_separator_swaps_delimiters() {
        let f = MoneyFormat::parse("{{amount_with_comma_separator}} €").unwrap();
        assert_eq!(f.render(123_456_789), "1.234.567,89 €");
        let f = MoneyFormat::parse("{{amount_no_decimals_with_comma_separator}} kr").unwrap();
        assert_eq!(f.render(123_456), "1.235 kr");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(MoneyFormat::default().render(-1999), "$-19.99");
    }

    #[test]
    fn rejects_missing_placeholder() {
        let err = MoneyFormat::parse("USD").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMoneyFormat { .. }));
    }

    #[test]
    fn rejects_unknown_placeholder() {
        let err = MoneyFormat::parse("{{price}}").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidMoneyFormat { ref reason, .. } if reason.contains("price"))
        );
    }

    #[test]
    fn closures_are_formatters() {
        let f = |cents: i64| format!("{cents}c");
        assert_eq!(PriceFormatter::format(&f, 42), "42c");
    }
}
