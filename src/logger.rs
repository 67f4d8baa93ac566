//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output shown only with `--verbose`
//! - `ProgressLine` for single-line batch progress display
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("trace"; "tracing {} images", count);
//!
//! // Progress line for a batch
//! let progress = ProgressLine::new("trace");
//! progress.report(0.5, "star.png");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::trace::ProgressSink;

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress bar count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
#[allow(clippy::cast_possible_truncation)] // Safe: bars count is always small
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        // Progress line has no trailing newline: wipe it, print, redraw below.
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "trace" => prefix.bright_blue().bold().to_string(),
        "sheet" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Progress Line (single-line batch progress)
// ============================================================================

/// Single-line progress display for a batch.
///
/// Displays: `[trace] 42% star.png`
///
/// Updates overwrite the same line. Uses `try_lock` to avoid blocking worker
/// threads - if display is busy, the update is skipped.
pub struct ProgressLine {
    module: &'static str,
    state: Mutex<(f64, String)>,
    lock: Mutex<()>,
}

impl ProgressLine {
    /// Create a new progress display.
    pub fn new(module: &'static str) -> Self {
        BAR_COUNT.store(1, Ordering::SeqCst);

        let progress = Self {
            module,
            state: Mutex::new((0.0, String::new())),
            lock: Mutex::new(()),
        };
        progress.display();
        progress
    }

    /// Display the current progress line (overwrites current line).
    fn display(&self) {
        let line = {
            let state = self.state.lock();
            format_progress(state.0, &state.1)
        };
        let prefix = colorize_prefix(self.module, self.module);

        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        write!(stdout, "{prefix} {line}").ok();
        stdout.flush().ok();
    }

    /// Finish progress display, preserve line and move to next line.
    pub fn finish(self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        {
            let _guard = self.lock.lock(); // Wait for any pending display
            self.display();
            let mut stdout = stdout().lock();
            writeln!(stdout).ok();
            stdout.flush().ok();
        }

        std::mem::forget(self); // Prevent Drop from clearing
    }
}

impl ProgressSink for ProgressLine {
    fn report(&self, fraction: f64, message: &str) {
        {
            let mut state = self.state.lock();
            *state = (fraction, message.to_string());
        }
        // Non-blocking: skip display if lock is held
        if let Some(_guard) = self.lock.try_lock() {
            self.display();
        }
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        BAR_COUNT.store(0, Ordering::SeqCst);

        // Clear the line on drop (if not finished properly)
        let mut stdout = stdout().lock();
        execute!(
            stdout,
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine)
        )
        .ok();
        stdout.flush().ok();
    }
}

/// Render a fraction in `[0, 1]` and the last finished item.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100
fn format_progress(fraction: f64, message: &str) -> String {
    let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as u32;
    if message.is_empty() {
        format!("{percent:>3}%")
    } else {
        format!("{percent:>3}% {message}")
    }
}

// ============================================================================
// Tests
// ============================================================================
