//! Configuration section definitions.
//!
//! Each module corresponds to a section in `svgmaker.toml`:
//!
//! | Module  | TOML Section                 | Purpose                          |
//! |---------|------------------------------|----------------------------------|
//! | `style` | `[style]`                    | Fill, stroke, opacity of paths   |
//! | `trace` | `[trace]`, `[trace.potrace]` | Raster tracing batch and backend |
//! | `sheet` | `[sheet]`                    | Icon sheet grid layout           |

mod sheet;
mod style;
mod trace;

pub use sheet::SheetConfig;
pub use style::StyleConfig;
pub use trace::{PotraceConfig, TraceConfig};
