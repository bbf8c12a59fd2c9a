//! Cursor pagination for the `products.json` listing.
//!
//! The listing advertises further pages in the `Link` response header:
//!
//! ```text
//! <https://shop.com/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.com/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```

/// Returns the `page_info` cursor of the `rel="next"` link, if any.
#[must_use]
pub fn next_page_cursor(link_header: Option<&str>) -> Option<String> {
    link_header?
        .split(',')
        .map(str::trim)
        .find(|directive| directive.contains(r#"rel="next""#))
        .and_then(link_target)
        .and_then(|url| query_value(url, "page_info"))
}

/// The URL between `<` and `>` of one link directive.
fn link_target(directive: &str) -> Option<&str> {
    let open = directive.find('<')?;
    let close = directive.find('>')?;
    (open + 1 < close).then(|| &directive[open + 1..close])
}

/// Value of `name` in the query string of `url`. Cursors are base64url so no
/// percent-decoding is done.
fn query_value(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_without_header() {
        assert_eq!(next_page_cursor(None), None);
    }

    #[test]
    fn reads_single_next_link() {
        let header = r#"<https://shop.com/products.json?limit=250&page_info=abc123>; rel="next""#;
        assert_eq!(next_page_cursor(Some(header)), Some("abc123".to_owned()));
    }

    #[test]
    fn skips_previous_link() {
        let header = concat!(
            r#"<https://shop.com/products.json?limit=250&page_info=prev>; rel="previous", "#,
            r#"<https://shop.com/products.json?limit=250&page_info=next>; rel="next""#
        );
        assert_eq!(next_page_cursor(Some(header)), Some("next".to_owned()));
    }

    #[test]
    fn none_on_last_page() {
        let header = r#"<https://shop.com/products.json?limit=250&page_info=prev>; rel="previous""#;
        assert_eq!(next_page_cursor(Some(header)), None);
    }

    #[test]
    fn ignores_fragment_and_empty_cursor() {
        let with_fragment = r#"<https://shop.com/products.json?page_info=xyz#top>; rel="next""#;
        assert_eq!(next_page_cursor(Some(with_fragment)), Some("xyz".to_owned()));
        let empty = r#"<https://shop.com/products.json?page_info=>; rel="next""#;
        assert_eq!(next_page_cursor(Some(empty)), None);
    }
}
