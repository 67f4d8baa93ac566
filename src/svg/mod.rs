//! SVG document handling.
//!
//! # Modules
//!
//! - [`normalize`]: cleanup and uniform styling of traced outlines
//! - [`style`]: the batch-wide [`StyleSpec`]
//! - [`xml`]: shared `quick-xml` helpers and number parsing

mod normalize;
mod style;
pub mod xml;

pub use normalize::normalize_traced_svg;
pub use style::StyleSpec;
pub use xml::format_number;
