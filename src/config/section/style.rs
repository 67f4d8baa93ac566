//! `[style]` section configuration.
//!
//! Styling applied uniformly to every path of every traced icon.
//!
//! # Example
//!
//! ```toml
//! [style]
//! stroke_width = 1.0   # 0 to 10
//! fill = "#000000"
//! stroke = "#000000"
//! opacity = 1.0        # 0 to 1 in steps of 0.1, used for both fill and stroke
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::svg::StyleSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Stroke width in user units.
    pub stroke_width: f64,

    /// Fill color (hex).
    pub fill: String,

    /// Stroke color (hex).
    pub stroke: String,

    /// Fill and stroke opacity.
    pub opacity: f64,
}

pub struct StyleConfigFields {
    pub stroke_width: FieldPath,
    pub fill: FieldPath,
    pub stroke: FieldPath,
    pub opacity: FieldPath,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            fill: "#000000".to_string(),
            stroke: "#000000".to_string(),
            opacity: 1.0,
        }
    }
}

impl StyleConfig {
    pub const FIELDS: StyleConfigFields = StyleConfigFields {
        stroke_width: FieldPath::new("style.stroke_width"),
        fill: FieldPath::new("style.fill"),
        stroke: FieldPath::new("style.stroke"),
        opacity: FieldPath::new("style.opacity"),
    };

    /// The style applied to a batch.
    pub fn to_spec(&self) -> StyleSpec {
        StyleSpec {
            stroke_width: self.stroke_width,
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            opacity: self.opacity,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.check_range(Self::FIELDS.stroke_width, self.stroke_width, 0.0, 10.0);
        diag.check_color(Self::FIELDS.fill, &self.fill);
        diag.check_color(Self::FIELDS.stroke, &self.stroke);
        diag.check_range(Self::FIELDS.opacity, self.opacity, 0.0, 1.0);
        diag.check_step(Self::FIELDS.opacity, self.opacity, 0.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.style, StyleConfig::default());
        assert_eq!(config.style.to_spec(), StyleSpec::default());
    }

    #[test]
    fn test_parse_style() {
        let config = test_parse_config(
            "[style]\nstroke_width = 2.5\nfill = \"#ff0000\"\nstroke = \"#00f\"\nopacity = 0.4",
        );
        let spec = config.style.to_spec();
        assert_eq!(spec.stroke_width, 2.5);
        assert_eq!(spec.fill, "#ff0000");
        assert_eq!(spec.stroke, "#00f");
        assert_eq!(spec.opacity, 0.4);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let style = StyleConfig {
            stroke_width: 11.0,
            fill: "red".into(),
            stroke: "#000000".into(),
            opacity: 1.5,
        };
        let mut diag = ConfigDiagnostics::new();
        style.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["style.stroke_width", "style.fill", "style.opacity"]);
    }

    #[test]
    fn test_validate_opacity_step() {
        let mut style = StyleConfig {
            opacity: 0.7,
            ..StyleConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        style.validate(&mut diag);
        assert!(diag.is_empty());

        style.opacity = 0.75;
        style.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "style.opacity");
    }
}
