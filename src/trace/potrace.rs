//! `potrace` command-line tracer.
//!
//! The raster goes to potrace's stdin as binary PGM and the SVG comes back
//! on stdout, so no temporary files are involved.

use std::time::Duration;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, GrayImage, ImageEncoder};

use super::Tracer;
use crate::config::PotraceConfig;
use crate::error::IconError;
use crate::svg::format_number;
use crate::utils::exec::Cmd;

/// Runs `potrace --svg` once per raster.
#[derive(Debug, Clone)]
pub struct PotraceTracer {
    command: Vec<String>,
    turdsize: u32,
    alphamax: f64,
    opttolerance: f64,
    unit: u32,
    timeout: Duration,
}

impl PotraceTracer {
    pub fn new(config: &PotraceConfig, timeout: Duration) -> Self {
        Self {
            command: config.command.clone(),
            turdsize: config.turdsize,
            alphamax: config.alphamax,
            opttolerance: config.opttolerance,
            unit: config.unit,
            timeout,
        }
    }

    /// Arguments appended after the configured command.
    fn args(&self) -> Vec<String> {
        vec![
            "--svg".to_string(),
            "--output".to_string(),
            "-".to_string(),
            "--turdsize".to_string(),
            self.turdsize.to_string(),
            "--alphamax".to_string(),
            format_number(self.alphamax),
            "--opttolerance".to_string(),
            format_number(self.opttolerance),
            "--unit".to_string(),
            self.unit.to_string(),
            "-".to_string(),
        ]
    }
}

impl Tracer for PotraceTracer {
    fn trace(&self, raster: &GrayImage) -> Result<String, IconError> {
        let pgm = encode_pgm(raster)?;

        let output = Cmd::from_slice(&self.command)
            .args(self.args())
            .stdin(pgm)
            .timeout(self.timeout)
            .run()
            .map_err(|e| IconError::TracerInvocationFailed(format!("{e:#}")))?;

        String::from_utf8(output.stdout)
            .map_err(|_| IconError::MalformedTraceOutput("output is not valid UTF-8".to_string()))
    }
}

/// Encode a grayscale raster as binary PGM (`P5`).
fn encode_pgm(raster: &GrayImage) -> Result<Vec<u8>, IconError> {
    let (width, height) = raster.dimensions();
    let mut buf = Vec::with_capacity(raster.as_raw().len() + 32);

    PnmEncoder::new(&mut buf)
        .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
        .write_image(raster.as_raw(), width, height, ExtendedColorType::L8)
        .map_err(|e| IconError::TracerInvocationFailed(format!("failed to encode raster: {e}")))?;

    Ok(buf)
}
