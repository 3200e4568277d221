// src/utils/html.rs

use std::sync::OnceLock;

use regex::Regex;

fn list_item_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<li\b[^>]*>").expect("valid list item regex"))
}

fn item_terminator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</(?:li|ol|ul)\s*>").expect("valid terminator regex"))
}

/// Inner markup of every `<li>` in `markup`, in document order, trimmed.
///
/// Closing `</li>` tags are optional in HTML, so an item also ends where the next
/// `<li>` starts or where its enclosing list closes. Nested lists are not supported.
pub fn extract_list_items(markup: &str) -> Vec<String> {
    let opens: Vec<_> = list_item_open().find_iter(markup).collect();

    opens
        .iter()
        .enumerate()
        .map(|(i, open)| {
            let end = opens.get(i + 1).map_or(markup.len(), |next| next.start());
            let segment = &markup[open.end()..end];
            let segment = match item_terminator().find(segment) {
                Some(close) => &segment[..close.start()],
                None => segment,
            };
            segment.trim().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_closed_items() {
        let items = extract_list_items("<ol><li>2 m/s</li><li class=\"x\"> <b>4</b> m/s </li></ol>");
        assert_eq!(items, vec!["2 m/s", "<b>4</b> m/s"]);
    }

    #[test]
    fn tolerates_missing_close_tags() {
        let items = extract_list_items("<UL><LI>one<LI>two</UL>");
        assert_eq!(items, vec!["one", "two"]);
    }

    #[test]
    fn no_items() {
        assert!(extract_list_items("<p>(A) 1 (B) 2</p>").is_empty());
    }

    #[test]
    fn does_not_match_similar_tags() {
        assert!(extract_list_items("<link rel=\"x\"><lib>").is_empty());
    }
}
