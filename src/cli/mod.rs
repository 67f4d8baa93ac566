//! Command-line interface module.

mod args;
pub mod init;
pub mod sheet;
pub mod trace;

pub use args::{Cli, Commands, SheetArgs, TraceArgs};
