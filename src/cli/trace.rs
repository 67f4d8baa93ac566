//! `svgmaker trace`: batch-trace raster icons into styled SVG files.

use anyhow::{Result, bail};
use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::TraceArgs;
use crate::config::Config;
use crate::logger::ProgressLine;
use crate::preview::render_preview_page;
use crate::trace::{BatchOutcome, BatchRequest, PotraceTracer, trace_batch};
use crate::utils::plural_count;
use crate::{debug, log};

/// Raster extensions picked up when walking input directories.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "pnm", "pgm", "ppm", "pbm"];

const PREVIEW_FILE: &str = "preview.html";

/// Trace every input and report per-item failures.
pub fn trace_icons(args: &TraceArgs, config: &Config) -> Result<()> {
    let sources = collect_sources(&args.paths);
    if sources.is_empty() {
        bail!("no raster images found in the given paths");
    }

    let request = BatchRequest {
        style: config.style.to_spec(),
        output_size: config.trace.output_size,
        output_dir: config.trace.output_dir.clone(),
        jobs: config.trace.worker_count(),
    };
    debug!(
        "trace";
        "{} with {} workers into {}",
        plural_count(sources.len(), "image"),
        request.jobs,
        request.output_dir.display()
    );

    let tracer = Arc::new(PotraceTracer::new(
        &config.trace.potrace,
        config.trace.timeout_duration(),
    ));

    let progress = ProgressLine::new("trace");
    let outcome = trace_batch(&sources, &request, tracer, &progress)?;
    progress.finish();

    report_failures(&outcome);

    if config.trace.preview {
        let path = write_preview(&outcome, &request.output_dir)?;
        debug!("trace"; "preview written to {}", path.display());
    }

    log!(
        "trace";
        "{} traced into {}",
        plural_count(outcome.succeeded(), "icon"),
        request.output_dir.display()
    );

    if outcome.succeeded() == 0 {
        bail!("every image failed to trace");
    }
    Ok(())
}

/// Expand directories into the raster files below them; files pass through.
///
/// Directory contents are sorted so batch order is stable across runs.
fn collect_sources(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for path in paths {
        if !path.is_dir() {
            sources.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|p| is_raster(p))
            .collect();
        found.sort();
        sources.extend(found);
    }
    sources
}

fn is_raster(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RASTER_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn report_failures(outcome: &BatchOutcome) {
    for failure in &outcome.failures {
        log!(
            "error";
            "{}: {} {}",
            failure.source.display(),
            failure.error.stage(),
            failure.error
        );
    }
}

fn write_preview(outcome: &BatchOutcome, output_dir: &Path) -> Result<PathBuf> {
    let title = format!("Traced icons ({})", plural_count(outcome.succeeded(), "icon"));
    let html = render_preview_page(&title, &outcome.previews);

    let path = output_dir.join(PREVIEW_FILE);
    fs::write(&path, html).map_err(|e| crate::error::IconError::Io(path.clone(), e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_raster() {
        assert!(is_raster(Path::new("a/star.PNG")));
        assert!(is_raster(Path::new("photo.jpeg")));
        assert!(!is_raster(Path::new("icon.svg")));
        assert!(!is_raster(Path::new("README")));
    }

    #[test]
    fn test_collect_sources_walks_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("set/inner");
        fs::create_dir_all(&nested).unwrap();
        for name in ["set/b.png", "set/a.jpg", "set/notes.txt", "set/inner/c.webp"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let explicit = dir.path().join("explicit.gif");
        let sources = collect_sources(&[explicit.clone(), dir.path().join("set")]);

        assert_eq!(sources[0], explicit);
        assert_eq!(sources.len(), 4);
        assert!(sources.iter().all(|p| !p.ends_with("notes.txt")));
        let mut walked = sources[1..].to_vec();
        walked.sort();
        assert_eq!(walked, sources[1..]);
    }

    #[test]
    fn test_preview_written_in_output_dir() {
        let dir = TempDir::new().unwrap();
        let outcome = BatchOutcome {
            documents: vec![Some(dir.path().join("a.svg")), None],
            previews: vec![Some("data:image/svg+xml;base64,AA==".to_string()), None],
            failures: Vec::new(),
        };

        let path = write_preview(&outcome, dir.path()).unwrap();
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("base64,AA=="));
        assert!(html.contains("<p>Error</p>"));
    }
}
