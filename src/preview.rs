//! HTML preview of a traced batch.
//!
//! Tiles follow batch order; a failed item keeps its slot with an `Error`
//! placeholder so the grid still lines up with the inputs.

use std::fmt::Write;

use crate::utils::html::escape;

/// Tiles per grid row.
pub const PREVIEW_COLUMNS: usize = 4;

const GRID_STYLE: &str = "gap: 10px; background-color: #f0f0f0; padding: 20px; border-radius: 10px;";
const TILE_STYLE: &str = "background-color: white; padding: 10px; border-radius: 5px;";

const ZOOM_CSS: &str = "<style>
  .zoomable { transition: transform 0.3s ease; cursor: zoom-in; }
  .zoomable.zoomed { transform: scale(2.5); z-index: 1000; position: relative; cursor: zoom-out; }
</style>";

/// Render the preview grid fragment.
///
/// Each `Some` is an image URI (usually a `data:` URI); each `None` renders
/// an error placeholder in its slot.
pub fn render_preview_grid(previews: &[Option<String>]) -> String {
    let mut html = String::with_capacity(256 + previews.iter().flatten().map(String::len).sum::<usize>());

    let _ = write!(
        html,
        r#"<div class="preview-grid" style="display: grid; grid-template-columns: repeat({PREVIEW_COLUMNS}, 1fr); {GRID_STYLE}">"#
    );
    for (index, preview) in previews.iter().enumerate() {
        match preview {
            Some(uri) => {
                let _ = write!(
                    html,
                    r#"<div style="{TILE_STYLE}"><img src="{}" alt="icon {}" style="width: 100%; height: auto;" onclick="this.classList.toggle('zoomed')" class="zoomable"></div>"#,
                    escape(uri),
                    index + 1
                );
            }
            None => {
                let _ = write!(html, r#"<div style="{TILE_STYLE}"><p>Error</p></div>"#);
            }
        }
    }
    html.push_str("</div>\n");
    html.push_str(ZOOM_CSS);
    html
}

/// Wrap the grid in a standalone HTML page.
pub fn render_preview_page(title: &str, previews: &[Option<String>]) -> String {
    let title = escape(title);
    let grid = render_preview_grid(previews);
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{title}</title>
</head>
<body style=\"font-family: sans-serif; margin: 2rem;\">
<h1>{title}</h1>
{grid}
</body>
</html>
"
    )
}
