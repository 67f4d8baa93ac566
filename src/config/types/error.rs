//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    // NOTE: No #[from] here - we don't want source() which causes duplicate output
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

// ============================================================================
// ConfigDiagnostic
// ============================================================================

/// A single configuration diagnostic
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    /// Config field path (e.g., "sheet.columns")
    pub field: FieldPath,
    /// Error description
    pub message: String,
    /// Fix hint (optional)
    pub hint: Option<String>,
}

impl ConfigDiagnostic {
    pub fn new(field: FieldPath, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}{}{}",
            "[".dimmed(),
            self.field.as_str().cyan(),
            "]".dimmed()
        )?;
        write!(f, "{} {}", "→".red(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

// ============================================================================
// ConfigDiagnostics
// ============================================================================

#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic::new(field, message));
    }

    /// Add an error with a hint.
    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors
            .push(ConfigDiagnostic::new(field, message).with_hint(hint));
    }

    /// Report `value` unless it lies in `min..=max`.
    pub fn check_range<T>(&mut self, field: FieldPath, value: T, min: T, max: T)
    where
        T: PartialOrd + fmt::Display + Copy,
    {
        // Written so NaN fails too.
        if !(value >= min && value <= max) {
            self.error(field, format!("must be between {min} and {max}, got {value}"));
        }
    }

    /// Report `value` unless it is a whole multiple of `step`.
    ///
    /// Non-finite values are left to [`check_range`](Self::check_range).
    pub fn check_step(&mut self, field: FieldPath, value: f64, step: f64) {
        let steps = value / step;
        if steps.is_finite() && (steps - steps.round()).abs() > 1e-9 {
            self.error_with_hint(
                field,
                format!("{value} is not a multiple of {step}"),
                format!("round to the nearest {step}"),
            );
        }
    }

    /// Report `value` unless it is a hex color.
    pub fn check_color(&mut self, field: FieldPath, value: &str) {
        if !crate::utils::color::is_hex_color(value) {
            self.error_with_hint(
                field,
                format!("`{value}` is not a hex color"),
                "use `#rrggbb` or `#rgb`, e.g. \"#000000\"",
            );
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// Convert to Result (returns Err if there are errors).
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", "config validation failed:".red().bold())?;
        for (i, err) in self.errors.iter().enumerate() {
            write!(f, "{err}")?;
            if i + 1 < self.errors.len() {
                writeln!(f, "\n")?;
            }
        }
        if self.errors.len() > 1 {
            write!(
                f,
                "\n\n{} {} {}",
                "found".dimmed(),
                self.errors.len().to_string().red().bold(),
                "errors".dimmed()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    const FIELD: FieldPath = FieldPath::new("sheet.columns");

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("svgmaker.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("svgmaker.toml"));
    }

    #[test]
    fn test_check_range() {
        let mut diag = ConfigDiagnostics::new();
        diag.check_range(FIELD, 4, 1, 10);
        diag.check_range(FIELD, 1, 1, 10);
        diag.check_range(FIELD, 10, 1, 10);
        assert!(diag.is_empty());

        diag.check_range(FIELD, 0, 1, 10);
        diag.check_range(FIELD, 11, 1, 10);
        diag.check_range(FieldPath::new("style.opacity"), f64::NAN, 0.0, 1.0);
        assert_eq!(diag.len(), 3);
        assert!(diag.errors()[0].message.contains("between 1 and 10"));
    }

    #[test]
    fn test_check_step() {
        let mut diag = ConfigDiagnostics::new();
        diag.check_step(FIELD, 0.3, 0.1);
        diag.check_step(FIELD, 0.0, 0.1);
        diag.check_step(FIELD, 1.0, 0.1);
        diag.check_step(FIELD, 512.0, 32.0);
        diag.check_step(FIELD, f64::NAN, 0.1);
        assert!(diag.is_empty());

        diag.check_step(FIELD, 0.25, 0.1);
        diag.check_step(FIELD, 500.0, 32.0);
        assert_eq!(diag.len(), 2);
        assert!(diag.errors()[1].message.contains("multiple of 32"));
        assert!(diag.errors()[1].hint.is_some());
    }

    #[test]
    fn test_check_color() {
        let mut diag = ConfigDiagnostics::new();
        diag.check_color(FIELD, "#ffffff");
        assert!(!diag.has_errors());

        diag.check_color(FIELD, "white");
        assert!(diag.has_errors());
        assert!(diag.errors()[0].hint.is_some());
    }

    #[test]
    fn test_diagnostics_display_counts_errors() {
        let mut diag = ConfigDiagnostics::new();
        diag.error(FIELD, "first");
        diag.error(FIELD, "second");
        let display = format!("{diag}");
        assert!(display.contains("first"));
        assert!(display.contains("second"));
        assert!(display.contains("errors"));
        assert!(diag.into_result().is_err());
    }
}
