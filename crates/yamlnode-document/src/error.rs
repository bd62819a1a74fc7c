//! Error types for document parsing, emitting and loading.

use crate::Location;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for yamlnode-document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing documents.
#[derive(Debug, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner.
    #[error("Parse error: {message} at {location}")]
    Parse { message: String, location: Location },

    /// Well-formed YAML that the document model cannot represent.
    #[error("Invalid YAML structure: {message} at {location}")]
    InvalidStructure { message: String, location: Location },

    /// The emitter failed to render a value.
    #[error("Failed to emit YAML: {message}")]
    Emit { message: String },

    /// The document file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Parse {
            message: err.info().to_string(),
            location: Location::from_marker(err.marker()),
        }
    }
}

impl Error {
    /// Attach a file name to the location carried by this error, if any.
    pub(crate) fn in_file(self, file: &str) -> Self {
        match self {
            Error::Parse { message, location } => Error::Parse {
                message,
                location: location.with_file(file),
            },
            Error::InvalidStructure { message, location } => Error::InvalidStructure {
                message,
                location: location.with_file(file),
            },
            other => other,
        }
    }
}
