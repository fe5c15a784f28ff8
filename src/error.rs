//! Error types for icon generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for icon operations
pub type Result<T> = std::result::Result<T, IconError>;

/// Errors that can stop an icon run
#[derive(Error, Debug)]
pub enum IconError {
    /// The binary was built without an encoder for the output format
    #[error("{format} encoding is not available in this build: {reason}")]
    MissingCapability {
        format: &'static str,
        reason: String,
    },

    /// An icon size outside 1..=max
    #[error("Icon size {size} is outside the supported range 1..={max}")]
    InvalidSize { size: u32, max: u32 },

    /// Creating the output directory or writing a file failed
    #[error("Failed to write {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IconError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IconError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the run should end with re-run instructions instead of a failure
    pub fn is_missing_capability(&self) -> bool {
        matches!(self, IconError::MissingCapability { .. })
    }
}
