//! `[trace]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [trace]
//! output_size = 512      # longest edge in pixels, 32 to 1024 in steps of 32
//! output_dir = "output"  # relative to the config file
//! jobs = 0               # worker threads, 0 = one per CPU
//! preview = true         # write preview.html next to the icons
//! timeout = 60           # seconds per tracer call
//!
//! [trace.potrace]
//! command = ["potrace"]
//! turdsize = 2
//! alphamax = 1.0
//! opttolerance = 0.2
//! unit = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Longest edge of the traced raster, in pixels.
    pub output_size: u32,

    /// Directory receiving one SVG per icon.
    pub output_dir: PathBuf,

    /// Worker thread count (0 = available parallelism).
    pub jobs: usize,

    /// Write an HTML preview grid after tracing.
    pub preview: bool,

    /// Seconds before a tracer call is killed.
    pub timeout: u64,

    pub potrace: PotraceConfig,
}

/// Settings for the `potrace` tracer backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotraceConfig {
    /// Command array; the first element is the program.
    pub command: Vec<String>,

    /// Suppress speckles of up to this many pixels.
    pub turdsize: u32,

    /// Corner threshold.
    pub alphamax: f64,

    /// Curve optimization tolerance.
    pub opttolerance: f64,

    /// Quantize output coordinates to 1/unit pixel.
    pub unit: u32,
}

pub struct TraceConfigFields {
    pub output_size: FieldPath,
    pub output_dir: FieldPath,
    pub jobs: FieldPath,
    pub timeout: FieldPath,
    pub potrace_command: FieldPath,
    pub potrace_alphamax: FieldPath,
    pub potrace_opttolerance: FieldPath,
    pub potrace_unit: FieldPath,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            output_size: 512,
            output_dir: PathBuf::from("output"),
            jobs: 0,
            preview: true,
            timeout: 60,
            potrace: PotraceConfig::default(),
        }
    }
}

impl Default for PotraceConfig {
    fn default() -> Self {
        Self {
            command: vec!["potrace".to_string()],
            turdsize: 2,
            alphamax: 1.0,
            opttolerance: 0.2,
            unit: 10,
        }
    }
}

impl TraceConfig {
    pub const FIELDS: TraceConfigFields = TraceConfigFields {
        output_size: FieldPath::new("trace.output_size"),
        output_dir: FieldPath::new("trace.output_dir"),
        jobs: FieldPath::new("trace.jobs"),
        timeout: FieldPath::new("trace.timeout"),
        potrace_command: FieldPath::new("trace.potrace.command"),
        potrace_alphamax: FieldPath::new("trace.potrace.alphamax"),
        potrace_opttolerance: FieldPath::new("trace.potrace.opttolerance"),
        potrace_unit: FieldPath::new("trace.potrace.unit"),
    };

    /// Number of worker threads to spawn.
    pub fn worker_count(&self) -> usize {
        if self.jobs > 0 {
            return self.jobs;
        }
        std::thread::available_parallelism().map_or(1, usize::from)
    }

    pub const fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.check_range(Self::FIELDS.output_size, self.output_size, 32, 1024);
        diag.check_step(Self::FIELDS.output_size, f64::from(self.output_size), 32.0);
        if self.output_dir.as_os_str().is_empty() {
            diag.error(Self::FIELDS.output_dir, "must not be empty");
        }
        if self.timeout == 0 {
            diag.error(Self::FIELDS.timeout, "must be at least 1 second");
        }

        let potrace = &self.potrace;
        if potrace.command.is_empty() {
            diag.error(Self::FIELDS.potrace_command, "must name a program");
        }
        if !(potrace.alphamax >= 0.0) {
            diag.error(Self::FIELDS.potrace_alphamax, "must not be negative");
        }
        if !(potrace.opttolerance >= 0.0) {
            diag.error(Self::FIELDS.potrace_opttolerance, "must not be negative");
        }
        if potrace.unit == 0 {
            diag.error(Self::FIELDS.potrace_unit, "must be at least 1");
        }
    }

    /// Check that the tracer program can be found.
    pub fn validate_tool(&self, diag: &mut ConfigDiagnostics) {
        let Some(program) = self.potrace.command.first() else {
            return;
        };
        if which::which(program).is_err() {
            diag.error_with_hint(
                Self::FIELDS.potrace_command,
                format!("`{program}` command not found"),
                format!(
                    "install potrace (https://potrace.sourceforge.net) or point {} at it",
                    Self::FIELDS.potrace_command
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        let trace = &config.trace;
        assert_eq!(trace.output_size, 512);
        assert_eq!(trace.output_dir, PathBuf::from("output"));
        assert_eq!(trace.jobs, 0);
        assert!(trace.preview);
        assert_eq!(trace.timeout_duration(), Duration::from_secs(60));
        assert_eq!(trace.potrace.command, ["potrace"]);
        assert_eq!(trace.potrace.turdsize, 2);
        assert_eq!(trace.potrace.unit, 10);
    }

    #[test]
    fn test_parse_potrace_section() {
        let config = test_parse_config(
            "[trace]\noutput_size = 256\njobs = 3\n[trace.potrace]\ncommand = [\"wsl\", \"potrace\"]\nalphamax = 0.5",
        );
        assert_eq!(config.trace.output_size, 256);
        assert_eq!(config.trace.worker_count(), 3);
        assert_eq!(config.trace.potrace.command, ["wsl", "potrace"]);
        assert_eq!(config.trace.potrace.alphamax, 0.5);
        assert_eq!(config.trace.potrace.opttolerance, 0.2);
    }

    #[test]
    fn test_worker_count_auto() {
        let trace = TraceConfig::default();
        assert!(trace.worker_count() >= 1);
    }

    #[test]
    fn test_validate_ranges() {
        let mut trace = TraceConfig {
            output_size: 2048,
            timeout: 0,
            ..Default::default()
        };
        trace.potrace.command.clear();
        trace.potrace.unit = 0;

        let mut diag = ConfigDiagnostics::new();
        trace.validate(&mut diag);
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "trace.output_size",
                "trace.timeout",
                "trace.potrace.command",
                "trace.potrace.unit"
            ]
        );
    }

    #[test]
    fn test_validate_output_size_step() {
        let mut trace = TraceConfig {
            output_size: 500,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        trace.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("multiple of 32"));

        trace.output_size = 480;
        let mut diag = ConfigDiagnostics::new();
        trace.validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_validate_tool_missing() {
        let mut trace = TraceConfig::default();
        trace.potrace.command = vec!["svgmaker-no-such-tracer".to_string()];

        let mut diag = ConfigDiagnostics::new();
        trace.validate_tool(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].message.contains("not found"));
    }
}
