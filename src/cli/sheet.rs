//! `svgmaker sheet`: pack SVG icons into one grid document.

use anyhow::{Context, Result};

use crate::cli::SheetArgs;
use crate::config::Config;
use crate::log;
use crate::sheet::create_icon_sheet;
use crate::utils::plural_count;

/// Build the sheet and print where it went.
///
/// With `--json` the computed layout goes to stdout instead of a log line,
/// so the output can be piped.
pub fn pack_icons(args: &SheetArgs, config: &Config) -> Result<()> {
    let layout_config = config.sheet.to_layout_config();
    let (path, layout) = create_icon_sheet(&args.icons, &layout_config, config.sheet.output.as_deref())?;

    if args.json {
        let json = serde_json::json!({
            "output": path,
            "layout": layout,
        });
        let text = serde_json::to_string_pretty(&json).context("Failed to serialize layout")?;
        println!("{text}");
        return Ok(());
    }

    log!(
        "sheet";
        "{} on a {}x{} sheet: {}",
        plural_count(layout.placements.len(), "icon"),
        layout.sheet_width,
        layout.sheet_height,
        path.display()
    );
    Ok(())
}
