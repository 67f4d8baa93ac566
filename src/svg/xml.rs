//! Small XML helpers shared by the normalizer and the sheet packer.
//!
//! Everything here works on `quick-xml` events and attribute values, never
//! on raw document text.

use quick_xml::events::BytesStart;
use quick_xml::name::ResolveResult;

/// The SVG namespace URI.
pub const SVG_NS_URI: &str = "http://www.w3.org/2000/svg";
/// [`SVG_NS_URI`] as bytes, for comparing resolved namespaces.
pub const SVG_NS: &[u8] = SVG_NS_URI.as_bytes();
/// The XLink namespace URI (still used by `href` in older icons).
pub const XLINK_NS_URI: &str = "http://www.w3.org/1999/xlink";
/// [`XLINK_NS_URI`] as bytes.
pub const XLINK_NS: &[u8] = XLINK_NS_URI.as_bytes();
/// The namespace bound to the reserved `xml:` prefix.
pub const XML_NS: &[u8] = b"http://www.w3.org/XML/1998/namespace";

/// A parsed `viewBox` attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Check whether a resolved name belongs to the SVG namespace.
#[inline]
pub fn is_svg_ns(resolved: &ResolveResult<'_>) -> bool {
    matches!(resolved, ResolveResult::Bound(ns) if ns.as_ref() == SVG_NS)
}

/// Namespaces whose elements and attributes survive normalization.
#[inline]
pub fn is_known_ns(ns: &[u8]) -> bool {
    ns == SVG_NS || ns == XLINK_NS || ns == XML_NS
}

/// Read and unescape an attribute by its exact (qualified) name.
pub fn attr_value(elem: &BytesStart<'_>, name: &str) -> Option<String> {
    elem.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse a length attribute such as `48`, `48px` or `512.000000pt`.
///
/// Trailing unit letters are stripped without conversion. Percentages and
/// non-finite values are rejected.
pub fn parse_length(value: &str) -> Option<f64> {
    let number = value.trim().trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let parsed: f64 = number.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Parse a `viewBox` value: four numbers separated by whitespace and/or commas.
pub fn parse_view_box(value: &str) -> Option<ViewBox> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<_>>()?;

    match numbers.as_slice() {
        &[x, y, width, height] => Some(ViewBox {
            x,
            y,
            width,
            height,
        }),
        _ => None,
    }
}

/// Format a number the way it is written into attributes.
///
/// Integral values print without a fractional part (`512`, not `512.0`).
#[inline]
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length_strips_units() {
        assert_eq!(parse_length("48"), Some(48.0));
        assert_eq!(parse_length("48px"), Some(48.0));
        assert_eq!(parse_length(" 512.000000pt "), Some(512.0));
        assert_eq!(parse_length("2.5em"), Some(2.5));
        assert_eq!(parse_length("100%"), None);
        assert_eq!(parse_length("px"), None);
        assert_eq!(parse_length(""), None);
    }

    #[test]
    fn test_parse_view_box() {
        assert_eq!(
            parse_view_box("0 0 24 24"),
            Some(ViewBox {
                x: 0.0,
                y: 0.0,
                width: 24.0,
                height: 24.0
            })
        );
        assert_eq!(
            parse_view_box("-5,10, 100 50"),
            Some(ViewBox {
                x: -5.0,
                y: 10.0,
                width: 100.0,
                height: 50.0
            })
        );
        assert_eq!(parse_view_box("0 0 24"), None);
        assert_eq!(parse_view_box("0 0 a b"), None);
        assert_eq!(parse_view_box(""), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(512.0), "512");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.25), "-3.25");
    }

    #[test]
    fn test_attr_value_unescapes() {
        let elem = BytesStart::from_content(r#"svg width="10" title="a &amp; b""#, 3);
        assert_eq!(attr_value(&elem, "width").as_deref(), Some("10"));
        assert_eq!(attr_value(&elem, "title").as_deref(), Some("a & b"));
        assert_eq!(attr_value(&elem, "height"), None);
    }
}
