//! Tracer output normalization.
//!
//! Rewrites the raw document a tracer produced into a plain SVG:
//!
//! ```text
//! raw tracer output
//!         │
//!         ▼
//!   ┌───────────┐
//!   │   strip   │ ──► prolog, comments, <metadata>, foreign namespaces, ns prefixes
//!   │           │     (xlink attributes are renamed to the `xlink:` prefix)
//!   └─────┬─────┘
//!         ▼
//!   ┌───────────┐
//!   │  resize   │ ──► root width / height / viewBox = target pixels
//!   └─────┬─────┘
//!         ▼
//!   ┌───────────┐
//!   │   style   │ ──► fill / stroke / opacity on every <path>
//!   └───────────┘
//! ```
//!
//! All edits happen on the `quick-xml` event stream, so user content that
//! merely looks like markup is never touched.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::{NsReader, Writer};

use super::style::{StyleSpec, strip_owned_declarations};
use super::xml::{SVG_NS, SVG_NS_URI, XLINK_NS, XLINK_NS_URI, format_number, is_known_ns};
use crate::error::IconError;

/// A normalized icon document and its inline preview.
#[derive(Debug, Clone)]
pub struct NormalizedSvg {
    /// Plain SVG markup.
    pub document: String,
    /// `data:image/svg+xml;base64,...` URI of `document`.
    pub preview: String,
}

/// Where an element lives, as far as normalization cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    /// SVG namespace, or no namespace at all (lenient for bare tracer output).
    Svg,
    /// Bound to some other namespace, or to an undeclared prefix.
    Foreign,
}

impl ElementKind {
    fn of(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Bound(ns) if ns.as_ref() == SVG_NS => Self::Svg,
            ResolveResult::Unbound => Self::Svg,
            _ => Self::Foreign,
        }
    }
}

/// Target geometry plus style for one icon.
struct Target<'a> {
    width: u32,
    height: u32,
    style: &'a StyleSpec,
    /// Declare `xmlns:xlink` on the root.
    xlink: bool,
}

/// Normalize a traced outline document.
///
/// `width`/`height` are the post-resize raster dimensions; they become the
/// document's `width`, `height` and `viewBox`.
pub fn normalize_traced_svg(
    raw: &str,
    width: u32,
    height: u32,
    style: &StyleSpec,
) -> Result<NormalizedSvg, IconError> {
    let xlink = uses_xlink(raw).map_err(IconError::MalformedTraceOutput)?;
    let target = Target {
        width,
        height,
        style,
        xlink,
    };
    let document = rewrite(raw, &target).map_err(IconError::MalformedTraceOutput)?;
    let preview = data_uri(&document);
    Ok(NormalizedSvg { document, preview })
}

/// Encode an SVG document as a base64 data URI.
pub fn data_uri(document: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        BASE64_STANDARD.encode(document.as_bytes())
    )
}

fn rewrite(raw: &str, target: &Target<'_>) -> Result<String, String> {
    let mut reader = NsReader::from_str(raw);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new(Vec::with_capacity(raw.len()));

    // Open elements written so far, and nesting inside a dropped subtree.
    let mut depth = 0usize;
    let mut skip_depth = 0usize;
    let mut seen_root = false;
    let mut root_closed = false;

    loop {
        let (kind, event) = {
            let (resolved, event) = reader.read_resolved_event().map_err(|e| e.to_string())?;
            (ElementKind::of(&resolved), event)
        };

        match event {
            Event::Start(elem) => {
                if skip_depth > 0 {
                    skip_depth += 1;
                    continue;
                }
                if is_noise(&elem, kind) {
                    skip_depth = 1;
                    continue;
                }
                let is_root = check_root(&elem, &mut seen_root, root_closed)?;
                let rewritten = rewrite_element(&elem, is_root, &reader, target)?;
                write(&mut writer, Event::Start(rewritten))?;
                depth += 1;
            }
            Event::Empty(elem) => {
                if skip_depth > 0 || is_noise(&elem, kind) {
                    continue;
                }
                let is_root = check_root(&elem, &mut seen_root, root_closed)?;
                let rewritten = rewrite_element(&elem, is_root, &reader, target)?;
                write(&mut writer, Event::Empty(rewritten))?;
                if is_root {
                    root_closed = true;
                }
            }
            Event::End(elem) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                    continue;
                }
                let local = elem.local_name();
                let name = String::from_utf8_lossy(local.as_ref()).into_owned();
                write(&mut writer, Event::End(BytesEnd::new(name)))?;
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Text(ref text) if text.is_empty() => {}
            Event::Text(_) | Event::CData(_) | Event::GeneralRef(_) => {
                if skip_depth == 0 && depth > 0 {
                    write(&mut writer, event)?;
                }
            }
            // Prolog, comments and processing instructions are tool noise.
            Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
            Event::Eof => break,
        }
    }

    if !seen_root {
        return Err("document has no <svg> root element".to_string());
    }
    if depth > 0 {
        return Err("document ends inside an open element".to_string());
    }

    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

/// Whether any attribute in the document is bound to the XLink namespace.
fn uses_xlink(raw: &str) -> Result<bool, String> {
    let mut reader = NsReader::from_str(raw);
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(elem) | Event::Empty(elem) => {
                let found = elem.attributes().flatten().any(|attr| {
                    matches!(
                        reader.resolve_attribute(attr.key).0,
                        ResolveResult::Bound(ns) if ns.as_ref() == XLINK_NS
                    )
                });
                if found {
                    return Ok(true);
                }
            }
            Event::Eof => return Ok(false),
            _ => {}
        }
    }
}

/// `<metadata>` blocks and anything outside the SVG namespace are dropped.
fn is_noise(elem: &BytesStart<'_>, kind: ElementKind) -> bool {
    kind == ElementKind::Foreign || elem.local_name().as_ref() == b"metadata"
}

/// Returns whether `elem` is the document root, rejecting non-SVG roots
/// and a second top-level element.
fn check_root(elem: &BytesStart<'_>, seen_root: &mut bool, root_closed: bool) -> Result<bool, String> {
    if root_closed {
        return Err("document has more than one root element".to_string());
    }
    if *seen_root {
        return Ok(false);
    }
    let local = elem.local_name();
    if local.as_ref() != b"svg" {
        return Err(format!(
            "root element is <{}>, expected <svg>",
            String::from_utf8_lossy(local.as_ref())
        ));
    }
    *seen_root = true;
    Ok(true)
}

/// Rebuild one element without prefixes or noise, applying geometry and style.
fn rewrite_element(
    elem: &BytesStart<'_>,
    is_root: bool,
    reader: &NsReader<&[u8]>,
    target: &Target<'_>,
) -> Result<BytesStart<'static>, String> {
    let local = elem.local_name();
    let name = String::from_utf8_lossy(local.as_ref()).into_owned();
    let is_path = name == "path";
    let bare_wrapper = name == "g" && is_bare_transform_group(elem);

    let mut out = BytesStart::new(name);
    if is_root {
        out.push_attribute(("xmlns", SVG_NS_URI));
        if target.xlink {
            out.push_attribute(("xmlns:xlink", XLINK_NS_URI));
        }
    }

    for attr in elem.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;

        // Declarations are regenerated on the root.
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let (resolved, attr_local) = reader.resolve_attribute(attr.key);
        let key: Cow<'_, [u8]> = match resolved {
            ResolveResult::Bound(ns) if ns.as_ref() == SVG_NS => Cow::Borrowed(attr_local.into_inner()),
            ResolveResult::Bound(ns) if ns.as_ref() == XLINK_NS => {
                Cow::Owned([b"xlink:".as_slice(), attr_local.as_ref()].concat())
            }
            ResolveResult::Bound(ns) if is_known_ns(ns.as_ref()) => Cow::Borrowed(attr.key.into_inner()),
            ResolveResult::Unbound => Cow::Borrowed(attr.key.into_inner()),
            _ => continue,
        };
        let key_str = String::from_utf8_lossy(&key);

        if is_root && matches!(key_str.as_ref(), "width" | "height" | "viewBox") {
            continue;
        }
        if bare_wrapper && key_str == "transform" {
            continue;
        }
        if is_path {
            if StyleSpec::owns(&key_str) {
                continue;
            }
            if key_str == "style" {
                let style = attr.unescape_value().map_err(|e| e.to_string())?;
                if let Some(kept) = strip_owned_declarations(&style) {
                    out.push_attribute(("style", kept.as_str()));
                }
                continue;
            }
        }

        out.push_attribute(Attribute {
            key: QName(&key),
            value: attr.value,
        });
    }

    if is_root {
        let width = format_number(f64::from(target.width));
        let height = format_number(f64::from(target.height));
        out.push_attribute(("width", width.as_str()));
        out.push_attribute(("height", height.as_str()));
        out.push_attribute(("viewBox", format!("0 0 {width} {height}").as_str()));
    }
    if is_path {
        for (key, value) in target.style.attributes() {
            out.push_attribute((key, value.as_str()));
        }
    }

    Ok(out.into_owned())
}

/// A group carrying nothing but a `transform` (namespace declarations aside).
fn is_bare_transform_group(elem: &BytesStart<'_>) -> bool {
    let mut keys = elem
        .attributes()
        .flatten()
        .filter(|attr| attr.key.as_namespace_binding().is_none())
        .map(|attr| attr.key.local_name().as_ref().to_vec());

    matches!(
        (keys.next(), keys.next()),
        (Some(key), None) if key == b"transform"
    )
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), String> {
    writer.write_event(event).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const POTRACE_LIKE: &str = r##"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 20010904//EN"
 "http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd">
<svg version="1.0" xmlns="http://www.w3.org/2000/svg"
 width="512.000000pt" height="256.000000pt" viewBox="0 0 512.000000 256.000000"
 preserveAspectRatio="xMidYMid meet">
<metadata>
Created by potrace 1.16, written by Peter Selinger 2001-2019
</metadata>
<g transform="translate(0.000000,256.000000) scale(0.100000,-0.100000)"
fill="#000000" stroke="none">
<path d="M10 10 L20 20 z"/>
<path d="M30 30 L40 40 z" fill="#ffffff"/>
</g>
</svg>
"##;

    fn style() -> StyleSpec {
        StyleSpec {
            stroke_width: 2.0,
            fill: "#112233".into(),
            stroke: "#445566".into(),
            opacity: 0.5,
        }
    }

    #[test]
    fn test_strips_prolog_and_metadata() {
        let out = normalize_traced_svg(POTRACE_LIKE, 512, 256, &style()).unwrap();
        let doc = &out.document;
        assert!(doc.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(!doc.contains("<?xml"));
        assert!(!doc.contains("DOCTYPE"));
        assert!(!doc.contains("metadata"));
        assert!(!doc.contains("potrace"));
    }

    #[test]
    fn test_sets_target_geometry() {
        let out = normalize_traced_svg(POTRACE_LIKE, 512, 256, &style()).unwrap();
        let doc = &out.document;
        assert!(doc.contains(r#"width="512""#));
        assert!(doc.contains(r#"height="256""#));
        assert!(doc.contains(r#"viewBox="0 0 512 256""#));
        assert!(!doc.contains("512.000000pt"));
        assert!(doc.contains(r#"preserveAspectRatio="xMidYMid meet""#));
    }

    #[test]
    fn test_styles_every_path() {
        let out = normalize_traced_svg(POTRACE_LIKE, 512, 256, &style()).unwrap();
        let doc = &out.document;
        assert_eq!(doc.matches(r##"fill="#112233""##).count(), 2);
        assert_eq!(doc.matches(r#"fill-opacity="0.5""#).count(), 2);
        assert_eq!(doc.matches(r##"stroke="#445566""##).count(), 2);
        assert_eq!(doc.matches(r#"stroke-width="2""#).count(), 2);
        assert_eq!(doc.matches(r#"stroke-opacity="0.5""#).count(), 2);
        assert!(!doc.contains(r##"fill="#ffffff""##));
    }

    #[test]
    fn test_keeps_styled_transform_group() {
        let out = normalize_traced_svg(POTRACE_LIKE, 512, 256, &style()).unwrap();
        assert!(out.document.contains("scale(0.100000,-0.100000)"));
    }

    #[test]
    fn test_drops_bare_transform_wrapper() {
        let raw = r#"<svg xmlns="http://www.w3.org/2000/svg"><g transform="scale(2)"><path d="M0 0"/></g></svg>"#;
        let out = normalize_traced_svg(raw, 10, 10, &StyleSpec::default()).unwrap();
        assert!(out.document.contains("<g>"));
        assert!(!out.document.contains("transform"));
    }

    #[test]
    fn test_removes_namespace_prefixes() {
        let raw = r#"<ns0:svg xmlns:ns0="http://www.w3.org/2000/svg" width="4" height="4"><ns0:g><ns0:path d="M0 0"/></ns0:g></ns0:svg>"#;
        let out = normalize_traced_svg(raw, 8, 8, &StyleSpec::default()).unwrap();
        let doc = &out.document;
        assert!(!doc.contains("ns0"));
        assert!(doc.contains("<g>"));
        assert!(doc.contains("<path d=\"M0 0\""));
        assert!(doc.ends_with("</g></svg>"));
    }

    #[test]
    fn test_drops_foreign_namespace_noise() {
        let raw = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:xlink="http://www.w3.org/1999/xlink" inkscape:version="1.0"><inkscape:guide/><use xlink:href="#a"/><path id="a" d="M0 0"/></svg>"##;
        let out = normalize_traced_svg(raw, 8, 8, &StyleSpec::default()).unwrap();
        let doc = &out.document;
        assert!(!doc.contains("inkscape"));
        assert!(doc.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(doc.contains(r##"xlink:href="#a""##));
        assert_eq!(doc.matches("xmlns:xlink=").count(), 1);
    }

    #[test]
    fn test_renames_xlink_prefix() {
        let raw = r##"<svg xmlns="http://www.w3.org/2000/svg"><g xmlns:x="http://www.w3.org/1999/xlink"><use x:href="#a"/></g><path id="a" d="M0 0"/></svg>"##;
        let out = normalize_traced_svg(raw, 8, 8, &StyleSpec::default()).unwrap();
        let doc = &out.document;
        assert!(doc.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(doc.contains(r##"<use xlink:href="#a"/>"##));
        assert!(!doc.contains(" x:href"));
        assert!(!doc.contains("xmlns:x="));

        let mut reader = NsReader::from_str(doc);
        loop {
            match reader.read_event().unwrap() {
                Event::Empty(elem) if elem.local_name().as_ref() == b"use" => {
                    let attr = elem.attributes().flatten().next().unwrap();
                    let (ns, local) = reader.resolve_attribute(attr.key);
                    assert!(matches!(ns, ResolveResult::Bound(ns) if ns.as_ref() == XLINK_NS));
                    assert_eq!(local.as_ref(), b"href");
                    break;
                }
                Event::Eof => panic!("no <use> in output"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_no_xlink_declaration_without_xlink_attributes() {
        let out = normalize_traced_svg(POTRACE_LIKE, 512, 256, &style()).unwrap();
        assert!(!out.document.contains("xmlns:xlink"));
    }

    #[test]
    fn test_overrides_inline_style_properties() {
        let raw = r#"<svg xmlns="http://www.w3.org/2000/svg"><path style="fill:red;display:inline" d="M0 0"/></svg>"#;
        let out = normalize_traced_svg(raw, 8, 8, &StyleSpec::default()).unwrap();
        assert!(out.document.contains(r#"style="display:inline""#));
        assert!(!out.document.contains("fill:red"));
    }

    #[test]
    fn test_collapses_whitespace_between_tags() {
        let out = normalize_traced_svg(POTRACE_LIKE, 512, 256, &style()).unwrap();
        assert!(!out.document.contains(">\n<"));
        assert!(!out.document.contains("> <"));
    }

    #[test]
    fn test_preview_is_base64_data_uri() {
        let out = normalize_traced_svg(POTRACE_LIKE, 512, 256, &style()).unwrap();
        let encoded = out
            .preview
            .strip_prefix("data:image/svg+xml;base64,")
            .unwrap();
        let decoded = BASE64_STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, out.document.as_bytes());
    }

    #[test]
    fn test_malformed_output_is_rejected() {
        let result = normalize_traced_svg("<svg><g></svg>", 8, 8, &StyleSpec::default());
        assert!(matches!(result, Err(IconError::MalformedTraceOutput(_))));

        let result = normalize_traced_svg("", 8, 8, &StyleSpec::default());
        assert!(matches!(result, Err(IconError::MalformedTraceOutput(_))));

        let result = normalize_traced_svg("<html/>", 8, 8, &StyleSpec::default());
        assert!(matches!(result, Err(IconError::MalformedTraceOutput(_))));

        let result = normalize_traced_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/>"#,
            8,
            8,
            &StyleSpec::default(),
        );
        assert!(matches!(result, Err(IconError::MalformedTraceOutput(_))));
    }
}
