// Harness-level errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Error returned by harness operations. Every variant names the path involved.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Filesystem failure (directory creation, listing, file open or write).
    #[error("{}: {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A codec rejected one file; the whole operation is aborted.
    #[error("{}: {source}", .path.display())]
    Codec {
        /// Input file being processed.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn codec(path: impl Into<PathBuf>) -> impl FnOnce(CodecError) -> Self {
        let path = path.into();
        move |source| Self::Codec { path, source }
    }
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
