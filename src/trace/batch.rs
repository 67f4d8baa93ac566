//! Batch tracing coordinator.
//!
//! ```text
//! sources ──► assign output names ──► rayon pool (jobs workers)
//!                                        │ per item: load → resize → trace → normalize → write
//!                                        ▼
//!                          crossbeam channel of (index, result)
//!                                        │
//!                                        ▼
//!                       slot arrays indexed by input position + progress
//! ```
//!
//! Items share nothing mutable; one bad image never aborts the batch.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;

use super::{ProgressSink, Tracer};
use crate::error::IconError;
use crate::image::{load_raster, prepare_raster};
use crate::svg::{StyleSpec, normalize_traced_svg};

/// Parameters shared by every item of one batch.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub style: StyleSpec,
    /// Longest edge of the traced raster.
    pub output_size: u32,
    pub output_dir: PathBuf,
    /// Worker threads; `0` uses the available parallelism.
    pub jobs: usize,
}

/// One input and the file its SVG is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// A per-item failure.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub source: PathBuf,
    pub error: IconError,
}

/// Results aligned to input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Written SVG path per input, `None` where the item failed.
    pub documents: Vec<Option<PathBuf>>,
    /// Base64 data URI per input, `None` where the item failed.
    pub previews: Vec<Option<String>>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    fn with_len(len: usize) -> Self {
        Self {
            documents: vec![None; len],
            previews: vec![None; len],
            failures: Vec::new(),
        }
    }

    /// Number of items that produced a document.
    pub fn succeeded(&self) -> usize {
        self.documents.iter().flatten().count()
    }
}

/// Assign each source an output file `<stem>.svg` in `output_dir`.
///
/// Repeated stems get `-2`, `-3`, ... in input order so no two items
/// write the same file.
pub fn assign_output_paths(sources: &[PathBuf], output_dir: &Path) -> Vec<BatchItem> {
    let mut used = HashSet::with_capacity(sources.len());

    sources
        .iter()
        .map(|source| {
            let stem = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "icon".to_string());

            let mut name = stem.clone();
            let mut counter = 1;
            while !used.insert(name.clone()) {
                counter += 1;
                name = format!("{stem}-{counter}");
            }

            BatchItem {
                source: source.clone(),
                output: output_dir.join(format!("{name}.svg")),
            }
        })
        .collect()
}

/// Trace every source in parallel.
///
/// Only setup problems (output directory, thread pool) fail the call; item
/// failures land in [`BatchOutcome::failures`] with empty slots.
pub fn trace_batch(
    sources: &[PathBuf],
    request: &BatchRequest,
    tracer: Arc<dyn Tracer>,
    progress: &dyn ProgressSink,
) -> Result<BatchOutcome> {
    let total = sources.len();
    let mut outcome = BatchOutcome::with_len(total);

    if total == 0 {
        progress.report(1.0, "");
        return Ok(outcome);
    }

    fs::create_dir_all(&request.output_dir)
        .map_err(|e| IconError::Io(request.output_dir.clone(), e))?;

    let items = assign_output_paths(sources, &request.output_dir);
    let request = Arc::new(request.clone());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(request.jobs)
        .thread_name(|i| format!("svgmaker-trace-{i}"))
        .panic_handler(|_| crate::log!("error"; "trace worker panicked"))
        .build()
        .context("failed to create trace thread pool")?;

    let (tx, rx) = channel::unbounded();
    for (index, item) in items.iter().cloned().enumerate() {
        let tx = tx.clone();
        let request = Arc::clone(&request);
        let tracer = Arc::clone(&tracer);
        pool.spawn(move || {
            let result = trace_item(&item, &request, tracer.as_ref());
            let _ = tx.send((index, result));
        });
    }
    // Workers hold the only senders now; the loop ends once all are gone.
    drop(tx);

    let mut completed = 0usize;
    for (index, result) in rx {
        match result {
            Ok(preview) => {
                outcome.documents[index] = Some(items[index].output.clone());
                outcome.previews[index] = Some(preview);
            }
            Err(error) => outcome.failures.push(BatchFailure {
                index,
                source: items[index].source.clone(),
                error,
            }),
        }

        completed += 1;
        progress.report(fraction(completed, total), &display_name(&items[index].source));
    }

    // A panicked worker never reports; still finish the bar.
    if completed < total {
        progress.report(1.0, "");
    }

    outcome.failures.sort_by_key(|failure| failure.index);
    Ok(outcome)
}

/// Resize, trace, normalize and write one item, returning its preview URI.
fn trace_item(item: &BatchItem, request: &BatchRequest, tracer: &dyn Tracer) -> Result<String, IconError> {
    let image = load_raster(&item.source)?;
    let raster = prepare_raster(&image, request.output_size).ok_or_else(|| {
        IconError::InvalidInputFile(
            item.source.display().to_string(),
            "image has zero width or height".to_string(),
        )
    })?;
    let (width, height) = raster.dimensions();

    let traced = tracer.trace(&raster)?;
    let normalized = normalize_traced_svg(&traced, width, height, &request.style)?;

    fs::write(&item.output, &normalized.document)
        .map_err(|e| IconError::Io(item.output.clone(), e))?;
    Ok(normalized.preview)
}

#[allow(clippy::cast_precision_loss)] // batch sizes are far below 2^52
fn fraction(completed: usize, total: usize) -> f64 {
    if completed >= total {
        1.0
    } else {
        completed as f64 / total as f64
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
