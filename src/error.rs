//! Error taxonomy shared by the tracing and sheet pipelines.
//!
//! Batch tracing isolates these per item; the sheet pipeline aborts on the
//! first one.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while tracing icons or assembling a sheet.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("invalid input file `{0}`: {1}")]
    InvalidInputFile(String, String),

    #[error("`{0}` is not an SVG document")]
    NotAnSvgDocument(String),

    #[error("`{0}` has no positive intrinsic size: {1}")]
    InvalidIconDimensions(String, String),

    #[error("tracer output could not be parsed: {0}")]
    MalformedTraceOutput(String),

    #[error("tracer invocation failed: {0}")]
    TracerInvocationFailed(String),

    #[error("failed to assemble icon sheet: {0}")]
    SheetAssemblyFailed(String),

    #[error("invalid sheet layout: {0}")]
    InvalidLayoutConfig(String),

    #[error("IO error when writing `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

impl IconError {
    /// Short stage label used when logging per-item failures.
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInputFile(..) | Self::NotAnSvgDocument(_) => "read",
            Self::InvalidIconDimensions(..) | Self::InvalidLayoutConfig(_) => "layout",
            Self::MalformedTraceOutput(_) => "normalize",
            Self::TracerInvocationFailed(_) => "trace",
            Self::SheetAssemblyFailed(_) => "compose",
            Self::Io(..) => "write",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_error_display_names_the_entry() {
        let err = IconError::InvalidIconDimensions("star.svg".into(), "missing width".into());
        let display = format!("{err}");
        assert!(display.contains("star.svg"));
        assert!(display.contains("missing width"));

        let err = IconError::NotAnSvgDocument("photo.png".into());
        assert!(format!("{err}").contains("photo.png"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = IconError::Io(
            PathBuf::from("out/icon.svg"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert!(format!("{err}").contains("out/icon.svg"));
        assert!(format!("{err}").contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.stage(), "write");
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(IconError::TracerInvocationFailed(String::new()).stage(), "trace");
        assert_eq!(IconError::MalformedTraceOutput(String::new()).stage(), "normalize");
        assert_eq!(IconError::SheetAssemblyFailed(String::new()).stage(), "compose");
    }
}
