//! Raster tracing.
//!
//! - [`Tracer`]: turns a grayscale raster into an outline document
//! - [`PotraceTracer`]: the `potrace` command-line backend
//! - [`trace_batch`]: parallel resize + trace + normalize over many inputs

mod batch;
mod potrace;

use image::GrayImage;

use crate::error::IconError;

pub use batch::{BatchOutcome, BatchRequest, trace_batch};
pub use potrace::PotraceTracer;

/// Converts a grayscale raster into vector outline document text.
///
/// Implementations are shared by every worker of a batch.
pub trait Tracer: Send + Sync {
    fn trace(&self, raster: &GrayImage) -> Result<String, IconError>;
}

/// Receives batch progress as a fraction of finished items.
pub trait ProgressSink: Send + Sync {
    /// `fraction` never decreases within one batch; `message` names the
    /// item that just finished.
    fn report(&self, fraction: f64, message: &str);
}

/// A sink that drops every report.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f64, _message: &str) {}
}
