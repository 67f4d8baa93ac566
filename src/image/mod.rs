//! Raster image loading and preparation for tracing.

mod raster;

pub use raster::{load_raster, prepare_raster};
