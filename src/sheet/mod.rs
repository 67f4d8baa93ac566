//! Icon sheet packing.
//!
//! ```text
//! paths ──► IconEntry::load ──► SheetLayout::compute ──► compose_sheet ──► file
//! ```
//!
//! The pipeline is all-or-nothing: the first unreadable icon or invalid
//! parameter aborts the call.

mod compose;
mod icon;
mod layout;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use compose::compose_sheet;
use icon::IconEntry;
use layout::SheetLayout;
pub use layout::SheetLayoutConfig;

use crate::debug;
use crate::error::IconError;

/// A composed sheet, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct IconSheet {
    pub document: String,
    pub layout: SheetLayout,
}

/// Load, lay out and compose the icons at `paths`, in order.
pub fn build_icon_sheet(paths: &[PathBuf], config: &SheetLayoutConfig) -> Result<IconSheet, IconError> {
    if paths.is_empty() {
        return Err(IconError::InvalidLayoutConfig("no icons to lay out".to_string()));
    }

    let entries = paths
        .iter()
        .map(|path| IconEntry::load(path))
        .collect::<Result<Vec<_>, _>>()?;

    let layout = SheetLayout::compute(&entries, config)?;
    debug!(
        "sheet";
        "{} icons in {}x{} grid, cell {} scaled by {}",
        entries.len(),
        layout.rows,
        layout.columns,
        layout.cell_size,
        layout.scale_factor
    );

    let document = compose_sheet(&entries, &layout, config)?;
    Ok(IconSheet { document, layout })
}

/// Write the sheet to `output`, or to a kept temporary file when `None`.
///
/// Returns the path written.
pub fn write_icon_sheet(document: &str, output: Option<&Path>) -> Result<PathBuf, IconError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| IconError::Io(parent.to_path_buf(), e))?;
            }
            fs::write(path, document).map_err(|e| IconError::Io(path.to_path_buf(), e))?;
            Ok(path.to_path_buf())
        }
        None => {
            let tmp_dir = std::env::temp_dir();
            let mut file = tempfile::Builder::new()
                .prefix("icon-sheet-")
                .suffix(".svg")
                .tempfile()
                .map_err(|e| IconError::Io(tmp_dir.clone(), e))?;
            file.write_all(document.as_bytes())
                .map_err(|e| IconError::Io(file.path().to_path_buf(), e))?;
            let (_, path) = file.keep().map_err(|e| IconError::Io(tmp_dir, e.error))?;
            Ok(path)
        }
    }
}

/// Build the sheet and write it; see [`build_icon_sheet`] and [`write_icon_sheet`].
pub fn create_icon_sheet(
    paths: &[PathBuf],
    config: &SheetLayoutConfig,
    output: Option<&Path>,
) -> Result<(PathBuf, SheetLayout), IconError> {
    let sheet = build_icon_sheet(paths, config)?;
    let path = write_icon_sheet(&sheet.document, output)?;
    Ok((path, sheet.layout))
}
