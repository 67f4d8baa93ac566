//! Serialize a computed layout into the composite sheet document.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::icon::IconEntry;
use super::layout::{SheetLayout, SheetLayoutConfig};
use crate::error::IconError;
use crate::svg::format_number;
use crate::svg::xml::SVG_NS_URI;

/// Build the composite SVG for `entries` placed by `layout`.
///
/// `layout` must have been computed from the same `entries`.
pub fn compose_sheet(
    entries: &[IconEntry],
    layout: &SheetLayout,
    config: &SheetLayoutConfig,
) -> Result<String, IconError> {
    if entries.len() != layout.placements.len() {
        return Err(IconError::SheetAssemblyFailed(format!(
            "{} icons but {} placements",
            entries.len(),
            layout.placements.len()
        )));
    }

    let fail = |e: std::io::Error| IconError::SheetAssemblyFailed(e.to_string());
    let width = format_number(layout.sheet_width);
    let height = format_number(layout.sheet_height);
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(fail)?;
    writer.get_mut().push(b'\n');

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", SVG_NS_URI));
    root.push_attribute(("width", width.as_str()));
    root.push_attribute(("height", height.as_str()));
    writer.write_event(Event::Start(root)).map_err(fail)?;

    if !config.transparent_background {
        let mut rect = BytesStart::new("rect");
        rect.push_attribute(("x", "0"));
        rect.push_attribute(("y", "0"));
        rect.push_attribute(("width", width.as_str()));
        rect.push_attribute(("height", height.as_str()));
        rect.push_attribute(("fill", config.background.as_str()));
        writer.write_event(Event::Empty(rect)).map_err(fail)?;
    }

    for (entry, placement) in entries.iter().zip(&layout.placements) {
        let transform = format!(
            "translate({},{}) scale({})",
            format_number(placement.translate_x),
            format_number(placement.translate_y),
            format_number(placement.scale)
        );
        // Each icon keeps its own prefix bindings so prefixes never clash.
        let mut group = BytesStart::new("g");
        for (prefix, uri) in &entry.namespaces {
            group.push_attribute((format!("xmlns:{prefix}").as_str(), uri.as_str()));
        }
        group.push_attribute(("transform", transform.as_str()));

        writer.write_event(Event::Start(group)).map_err(fail)?;
        writer.get_mut().write_all(&entry.body).map_err(fail)?;
        writer
            .write_event(Event::End(BytesEnd::new("g")))
            .map_err(fail)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("svg")))
        .map_err(fail)?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| IconError::SheetAssemblyFailed(format!("output is not UTF-8: {e}")))
}
