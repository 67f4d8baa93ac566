//! Grid geometry for the icon sheet.
//!
//! Every cell is sized for the largest icon, then the whole grid is scaled
//! uniformly so its width equals the configured sheet width. Each icon is
//! then scaled to fill the padded cell on its longer side and anchored at
//! the cell's top-left padding corner.

use serde::Serialize;

use super::icon::IconEntry;
use crate::error::IconError;

/// Parameters of a sheet layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayoutConfig {
    pub columns: usize,
    /// Space around each icon inside its cell, before scaling.
    pub padding: f64,
    pub background: String,
    pub sheet_width: f64,
    pub transparent_background: bool,
}

/// Where one icon lands on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IconPlacement {
    pub row: usize,
    pub col: usize,
    /// Scaled cell origin.
    pub x: f64,
    pub y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

/// Result of packing icons into a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetLayout {
    /// Unscaled cell side: largest icon side plus padding on both sides.
    pub cell_size: f64,
    pub scaled_cell_size: f64,
    pub scale_factor: f64,
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub rows: usize,
    pub columns: usize,
    /// One per icon, in input order.
    pub placements: Vec<IconPlacement>,
}

impl SheetLayout {
    /// Compute placements for `entries` in row-major input order.
    #[allow(clippy::cast_precision_loss)] // grid indices are small
    pub fn compute(entries: &[IconEntry], config: &SheetLayoutConfig) -> Result<Self, IconError> {
        validate(entries, config)?;

        let columns = config.columns;
        let padding = config.padding;
        let max_icon = entries
            .iter()
            .map(|entry| entry.size.max_side())
            .fold(0.0_f64, f64::max);

        let cell_size = max_icon + 2.0 * padding;
        let rows = entries.len().div_ceil(columns);
        let scale_factor = config.sheet_width / (columns as f64 * cell_size);
        let scaled_cell_size = cell_size * scale_factor;
        let sheet_height = rows as f64 * scaled_cell_size;
        let offset = padding * scale_factor;
        let inner = scaled_cell_size - 2.0 * offset;

        let placements = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let row = index / columns;
                let col = index % columns;
                let x = col as f64 * scaled_cell_size;
                let y = row as f64 * scaled_cell_size;

                let scale = (inner / entry.size.width).min(inner / entry.size.height);
                let (origin_x, origin_y) = entry.size.origin.unwrap_or((0.0, 0.0));
                IconPlacement {
                    row,
                    col,
                    x,
                    y,
                    translate_x: x + offset - origin_x * scale,
                    translate_y: y + offset - origin_y * scale,
                    scale,
                }
            })
            .collect();

        Ok(Self {
            cell_size,
            scaled_cell_size,
            scale_factor,
            sheet_width: config.sheet_width,
            sheet_height,
            rows,
            columns,
            placements,
        })
    }
}

fn validate(entries: &[IconEntry], config: &SheetLayoutConfig) -> Result<(), IconError> {
    let invalid = |msg: String| Err(IconError::InvalidLayoutConfig(msg));

    if entries.is_empty() {
        return invalid("no icons to lay out".to_string());
    }
    if config.columns == 0 {
        return invalid("columns must be at least 1".to_string());
    }
    if !config.padding.is_finite() || config.padding < 0.0 {
        return invalid(format!("padding must be non-negative, got {}", config.padding));
    }
    if !config.sheet_width.is_finite() || config.sheet_width <= 0.0 {
        return invalid(format!("sheet width must be positive, got {}", config.sheet_width));
    }

    if let Some(entry) = entries.iter().find(|entry| !entry.size.is_positive()) {
        return Err(IconError::InvalidIconDimensions(
            entry.name.clone(),
            format!("{} x {}", entry.size.width, entry.size.height),
        ));
    }
    Ok(())
}
