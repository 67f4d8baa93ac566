//! Uniform path styling applied to every traced icon in a batch.

use super::xml::format_number;

/// Presentation attributes written onto every `<path>` of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub stroke_width: f64,
    pub fill: String,
    pub stroke: String,
    pub opacity: f64,
}

/// Property names owned by [`StyleSpec`]; anything else on a path is left alone.
pub const STYLE_PROPERTIES: [&str; 5] = [
    "fill",
    "fill-opacity",
    "stroke",
    "stroke-width",
    "stroke-opacity",
];

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            fill: "#000000".to_string(),
            stroke: "#000000".to_string(),
            opacity: 1.0,
        }
    }
}

impl StyleSpec {
    /// Attribute name/value pairs in the order they are written.
    pub fn attributes(&self) -> [(&'static str, String); 5] {
        let opacity = format_number(self.opacity);
        [
            ("fill", self.fill.clone()),
            ("fill-opacity", opacity.clone()),
            ("stroke", self.stroke.clone()),
            ("stroke-width", format_number(self.stroke_width)),
            ("stroke-opacity", opacity),
        ]
    }

    /// Whether an attribute or CSS property name is set by this style.
    #[inline]
    pub fn owns(name: &str) -> bool {
        STYLE_PROPERTIES.contains(&name)
    }
}

/// Remove style-owned declarations from an inline `style` attribute.
///
/// Returns `None` when nothing is left, so the attribute can be dropped.
pub fn strip_owned_declarations(style: &str) -> Option<String> {
    let kept: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            let property = decl.split(':').next().unwrap_or_default().trim();
            !StyleSpec::owns(&property.to_ascii_lowercase())
        })
        .collect();

    (!kept.is_empty()).then(|| kept.join(";"))
}
