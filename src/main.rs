//! svgmaker - trace raster icons into SVG and pack SVG icons into sheets.

#![allow(dead_code)]

mod cli;
mod config;
mod error;
mod image;
mod logger;
mod preview;
mod sheet;
mod svg;
mod trace;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Init { dry } => cli::init::new_config(&config, *dry),
        Commands::Trace { args } => cli::trace::trace_icons(args, &config),
        Commands::Sheet { args } => cli::sheet::pack_icons(args, &config),
    }
}
