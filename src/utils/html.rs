//! HTML entity escaping for generated pages.

use std::borrow::Cow;

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters.
///
/// Borrows the input when nothing needs escaping.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<b>"), "&lt;b&gt;");
/// ```
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<img src=\"x\">"), "&lt;img src=&quot;x&quot;&gt;");
        assert_eq!(escape("Tom & Jerry's"), "Tom &amp; Jerry&#39;s");
    }

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape("data:image/svg+xml;base64,PHN2Zz4="), Cow::Borrowed(_)));
    }
}
