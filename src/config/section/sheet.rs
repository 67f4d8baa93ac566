//! `[sheet]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sheet]
//! columns = 4            # 1 to 10
//! padding = 10.0         # pixels around each icon, 0 to 50
//! background = "#ffffff"
//! width = 1000.0         # sheet width in pixels, 100 to 2000
//! transparent = false    # omit the background rect
//! # output = "sheet.svg" # default: a temporary file
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::sheet::SheetLayoutConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Icons per row.
    pub columns: usize,

    /// Padding inside each cell, in pixels.
    pub padding: f64,

    /// Background color (hex).
    pub background: String,

    /// Width of the composite sheet, in pixels.
    pub width: f64,

    /// Skip the background rect.
    pub transparent: bool,

    /// Where to write the sheet (relative to the config file).
    pub output: Option<PathBuf>,
}

pub struct SheetConfigFields {
    pub columns: FieldPath,
    pub padding: FieldPath,
    pub background: FieldPath,
    pub width: FieldPath,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            padding: 10.0,
            background: "#ffffff".to_string(),
            width: 1000.0,
            transparent: false,
            output: None,
        }
    }
}

impl SheetConfig {
    pub const FIELDS: SheetConfigFields = SheetConfigFields {
        columns: FieldPath::new("sheet.columns"),
        padding: FieldPath::new("sheet.padding"),
        background: FieldPath::new("sheet.background"),
        width: FieldPath::new("sheet.width"),
    };

    pub fn to_layout_config(&self) -> SheetLayoutConfig {
        SheetLayoutConfig {
            columns: self.columns,
            padding: self.padding,
            background: self.background.clone(),
            sheet_width: self.width,
            transparent_background: self.transparent,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.check_range(Self::FIELDS.columns, self.columns, 1, 10);
        diag.check_range(Self::FIELDS.padding, self.padding, 0.0, 50.0);
        diag.check_color(Self::FIELDS.background, &self.background);
        diag.check_range(Self::FIELDS.width, self.width, 100.0, 2000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        let layout = config.sheet.to_layout_config();
        assert_eq!(layout.columns, 4);
        assert_eq!(layout.padding, 10.0);
        assert_eq!(layout.background, "#ffffff");
        assert_eq!(layout.sheet_width, 1000.0);
        assert!(!layout.transparent_background);
        assert!(config.sheet.output.is_none());
    }

    #[test]
    fn test_parse_sheet() {
        let config = test_parse_config(
            "[sheet]\ncolumns = 2\npadding = 0\nwidth = 500\ntransparent = true\noutput = \"icons.svg\"",
        );
        assert_eq!(config.sheet.columns, 2);
        assert_eq!(config.sheet.padding, 0.0);
        assert_eq!(config.sheet.width, 500.0);
        assert!(config.sheet.transparent);
        assert_eq!(config.sheet.output, Some(PathBuf::from("icons.svg")));
    }

    #[test]
    fn test_validate_ranges() {
        let sheet = SheetConfig {
            columns: 0,
            padding: 51.0,
            background: "#12345".into(),
            width: 99.0,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        sheet.validate(&mut diag);
        assert_eq!(diag.len(), 4);

        let mut diag = ConfigDiagnostics::new();
        SheetConfig::default().validate(&mut diag);
        assert!(diag.is_empty());
    }
}
