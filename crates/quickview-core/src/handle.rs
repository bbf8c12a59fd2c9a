/// Derive a storefront handle from a product title.
///
/// Lowercases, turns whitespace runs into a single `-`, drops characters
/// that are not ASCII alphanumerics or `-`, and collapses repeated dashes.
/// `"Soft Winter Jacket"` becomes `"soft-winter-jacket"`.
#[must_use]
pub fn handleize(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_title() {
        assert_eq!(handleize("Soft Winter Jacket"), "soft-winter-jacket");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(handleize("  Classic   Tee\t2 "), "classic-tee-2");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(handleize("Kid's T-Shirt (Blue)"), "kids-t-shirt-blue");
    }
}
