//! Reading one icon document for packing.
//!
//! Only the root element is interpreted. Everything inside it is copied
//! through unchanged so it can be re-parented into the sheet.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::PrefixDeclaration;
use quick_xml::{NsReader, Writer};

use crate::error::IconError;
use crate::svg::xml::{ViewBox, attr_value, is_svg_ns, parse_length, parse_view_box};

/// Declared size of an icon, in its own user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicSize {
    pub width: f64,
    pub height: f64,
    /// `viewBox` origin, when the size came from a `viewBox`.
    pub origin: Option<(f64, f64)>,
}

impl IntrinsicSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin: None,
        }
    }

    pub const fn from_view_box(vb: ViewBox) -> Self {
        Self {
            width: vb.width,
            height: vb.height,
            origin: Some((vb.x, vb.y)),
        }
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// One parsed input icon.
#[derive(Debug, Clone)]
pub struct IconEntry {
    /// File name or label used in error messages.
    pub name: String,
    pub size: IntrinsicSize,
    /// Serialized children of the root element.
    pub body: Vec<u8>,
    /// `xmlns:prefix` declarations found on the root, in document order.
    pub namespaces: Vec<(String, String)>,
}

impl IconEntry {
    /// Read and parse an icon file.
    pub fn load(path: &Path) -> Result<Self, IconError> {
        let name = path.display().to_string();
        let bytes =
            fs::read(path).map_err(|e| IconError::InvalidInputFile(name.clone(), e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|_| IconError::NotAnSvgDocument(name.clone()))?;
        Self::parse(&name, &text)
    }

    /// Parse icon markup.
    ///
    /// The root must be `svg` in the SVG namespace. Anything that fails
    /// before the root is found is not an SVG document; a broken body after
    /// a valid root is an invalid input file.
    pub fn parse(name: &str, text: &str) -> Result<Self, IconError> {
        let not_svg = || IconError::NotAnSvgDocument(name.to_string());
        let mut reader = NsReader::from_str(text);

        let (root, is_empty) = loop {
            let (is_svg, event) = {
                let (resolved, event) = reader.read_resolved_event().map_err(|_| not_svg())?;
                (is_svg_ns(&resolved), event)
            };

            match event {
                Event::Start(elem) | Event::Empty(elem)
                    if !is_svg || elem.local_name().as_ref() != b"svg" =>
                {
                    return Err(not_svg());
                }
                Event::Start(elem) => break (elem, false),
                Event::Empty(elem) => break (elem, true),
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
                Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
                _ => return Err(not_svg()),
            }
        };

        let size = intrinsic_size(name, &root)?;
        let namespaces = prefix_declarations(&root);
        let body = if is_empty {
            Vec::new()
        } else {
            copy_body(name, &mut reader)?
        };

        Ok(Self {
            name: name.to_string(),
            size,
            body,
            namespaces,
        })
    }
}

/// `viewBox` dimensions if present, else `width`/`height` with units stripped.
fn intrinsic_size(name: &str, root: &BytesStart<'_>) -> Result<IntrinsicSize, IconError> {
    let invalid = |reason: String| IconError::InvalidIconDimensions(name.to_string(), reason);

    let size = if let Some(value) = attr_value(root, "viewBox") {
        let vb = parse_view_box(&value).ok_or_else(|| invalid(format!("unparseable viewBox `{value}`")))?;
        IntrinsicSize::from_view_box(vb)
    } else {
        let length = |attr: &str| {
            let value = attr_value(root, attr).ok_or_else(|| invalid(format!("no viewBox and no {attr}")))?;
            parse_length(&value).ok_or_else(|| invalid(format!("unparseable {attr} `{value}`")))
        };
        IntrinsicSize::new(length("width")?, length("height")?)
    };

    if !size.is_positive() {
        return Err(invalid(format!("{} x {} is not a positive size", size.width, size.height)));
    }
    Ok(size)
}

/// Collect `xmlns:prefix="uri"` declarations from the root element.
fn prefix_declarations(root: &BytesStart<'_>) -> Vec<(String, String)> {
    root.attributes()
        .flatten()
        .filter_map(|attr| match attr.key.as_namespace_binding()? {
            PrefixDeclaration::Named(prefix) => Some((
                String::from_utf8_lossy(prefix).into_owned(),
                attr.unescape_value().ok()?.into_owned(),
            )),
            PrefixDeclaration::Default => None,
        })
        .collect()
}

/// Re-serialize every event up to the root's closing tag.
fn copy_body(name: &str, reader: &mut NsReader<&[u8]>) -> Result<Vec<u8>, IconError> {
    let invalid = |reason: String| IconError::InvalidInputFile(name.to_string(), reason);
    let mut writer = Writer::new(Vec::new());
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| invalid(format!("malformed SVG body: {e}")))?;

        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(invalid("document ends inside <svg>".to_string())),
            _ => {}
        }

        writer
            .write_event(event)
            .map_err(|e| invalid(format!("failed to copy SVG body: {e}")))?;
    }

    Ok(writer.into_inner())
}
