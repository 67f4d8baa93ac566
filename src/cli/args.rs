//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Trace raster icons into SVG and pack SVG icons into sheets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: svgmaker.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "svgmaker.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default svgmaker.toml in the current directory
    #[command(visible_alias = "i")]
    Init {
        /// Print the config template instead of writing it
        #[arg(long)]
        dry: bool,
    },

    /// Trace raster images into styled SVG outlines
    #[command(visible_alias = "t")]
    Trace {
        #[command(flatten)]
        args: TraceArgs,
    },

    /// Pack SVG icons into a single grid sheet
    #[command(visible_alias = "s")]
    Sheet {
        #[command(flatten)]
        args: SheetArgs,
    },
}

/// Trace command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct TraceArgs {
    /// Raster images, or directories to search for them
    #[arg(required = true, value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Directory for the traced SVG files
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Longest edge of the traced raster in pixels (32-1024, steps of 32)
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Stroke width applied to every path (0-10)
    #[arg(long)]
    pub stroke_width: Option<f64>,

    /// Fill color (hex)
    #[arg(long)]
    pub fill: Option<String>,

    /// Stroke color (hex)
    #[arg(long)]
    pub stroke: Option<String>,

    /// Fill and stroke opacity (0-1, steps of 0.1)
    #[arg(long)]
    pub opacity: Option<f64>,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Skip writing preview.html
    #[arg(long)]
    pub no_preview: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Sheet command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct SheetArgs {
    /// SVG icons, in placement order
    #[arg(required = true, value_name = "SVG", value_hint = clap::ValueHint::FilePath)]
    pub icons: Vec<PathBuf>,

    /// Output file (default: a new temporary file)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Icons per row (1-10)
    #[arg(short, long)]
    pub columns: Option<usize>,

    /// Padding around each icon in pixels (0-50)
    #[arg(short, long)]
    pub padding: Option<f64>,

    /// Background color (hex)
    #[arg(short, long)]
    pub background: Option<String>,

    /// Sheet width in pixels (100-2000)
    #[arg(short, long)]
    pub width: Option<f64>,

    /// Leave the background transparent
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub transparent: Option<bool>,

    /// Print the computed layout as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    pub const fn verbose(&self) -> bool {
        match &self.command {
            Commands::Trace { args } => args.verbose,
            Commands::Sheet { args } => args.verbose,
            Commands::Init { .. } => false,
        }
    }
}
