//! Hex color validation for style and sheet settings.

use regex::Regex;
use std::sync::OnceLock;

/// Check whether `value` is a `#RGB` or `#RRGGBB` hex color.
pub fn is_hex_color(value: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());
    re.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_short_and_long_forms() {
        assert!(is_hex_color("#000000"));
        assert!(is_hex_color("#FFaa00"));
        assert!(is_hex_color("#fff"));
    }

    #[test]
    fn test_rejects_other_notations() {
        assert!(!is_hex_color("000000"));
        assert!(!is_hex_color("#00000"));
        assert!(!is_hex_color("#gggggg"));
        assert!(!is_hex_color("red"));
        assert!(!is_hex_color("rgb(0,0,0)"));
        assert!(!is_hex_color("#0000000"));
        assert!(!is_hex_color(""));
    }
}
