//! Project configuration management for `svgmaker.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── style      # [style]
//! │   ├── trace      # [trace], [trace.potrace]
//! │   └── sheet      # [sheet]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # Config (this file)
//! ```
//!
//! The file is optional: without one every section takes its defaults and
//! CLI flags fill in the rest.

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, resolve_path};

pub use section::{PotraceConfig, SheetConfig, StyleConfig, TraceConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands, SheetArgs, TraceArgs},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgmaker.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths are resolved against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Path styling for traced icons
    #[serde(default)]
    pub style: StyleConfig,

    /// Batch tracing settings
    #[serde(default)]
    pub trace: TraceConfig,

    /// Icon sheet settings
    #[serde(default)]
    pub sheet: SheetConfig,
}

impl Config {
    /// Load configuration for the current command.
    ///
    /// Searches upward from cwd for the config file. CLI options override
    /// file values, then the result is validated as a whole.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = if cli.is_init() {
            Self::default()
        } else {
            match find_config_file(&cli.config) {
                Some(path) => {
                    let mut config = Self::from_path(&path)?;
                    config.config_path = Some(path);
                    config
                }
                None => Self::default(),
            }
        };

        config.root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);

        config.apply_command_options(cli);
        config.normalize_paths();

        if !cli.is_init() {
            config.validate(&cli.command)?;
        }

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose());

        match &cli.command {
            Commands::Trace { args } => self.apply_trace_args(args),
            Commands::Sheet { args } => self.apply_sheet_args(args),
            Commands::Init { .. } => {}
        }
    }

    /// Apply trace arguments from CLI.
    fn apply_trace_args(&mut self, args: &TraceArgs) {
        Self::update_option(&mut self.style.stroke_width, args.stroke_width.as_ref());
        Self::update_option(&mut self.style.fill, args.fill.as_ref());
        Self::update_option(&mut self.style.stroke, args.stroke.as_ref());
        Self::update_option(&mut self.style.opacity, args.opacity.as_ref());

        Self::update_option(&mut self.trace.output_size, args.size.as_ref());
        Self::update_option(&mut self.trace.jobs, args.jobs.as_ref());
        if args.no_preview {
            self.trace.preview = false;
        }

        // A CLI path is relative to where the user typed it
        if let Some(dir) = &args.output_dir {
            self.trace.output_dir = Self::from_cwd(dir);
        }
    }

    /// Apply sheet arguments from CLI.
    fn apply_sheet_args(&mut self, args: &SheetArgs) {
        Self::update_option(&mut self.sheet.columns, args.columns.as_ref());
        Self::update_option(&mut self.sheet.padding, args.padding.as_ref());
        Self::update_option(&mut self.sheet.background, args.background.as_ref());
        Self::update_option(&mut self.sheet.width, args.width.as_ref());
        Self::update_option(&mut self.sheet.transparent, args.transparent.as_ref());
        if let Some(output) = &args.output {
            self.sheet.output = Some(Self::from_cwd(output));
        }
    }

    fn from_cwd(path: &Path) -> PathBuf {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Anchor relative paths at the root, expanding `~`.
    fn normalize_paths(&mut self) {
        self.trace.output_dir = resolve_path(&self.trace.output_dir, &self.root);
        if let Some(output) = self.sheet.output.take() {
            self.sheet.output = Some(resolve_path(&output, &self.root));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the given command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.style.validate(&mut diag);
        self.trace.validate(&mut diag);
        self.sheet.validate(&mut diag);

        // Only tracing needs the external tool
        if matches!(command, Commands::Trace { .. }) {
            self.trace.validate_tool(&mut diag);
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
