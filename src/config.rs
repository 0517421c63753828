// Harness configuration.
//
// Everything here has a working default; the CLI maps its flags onto these
// structs, library callers build them directly.

use std::path::PathBuf;

/// Default I/O buffer size for per-file readers and writers.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024; // 64 KiB

/// Directory name used under the system temp dir for synthesized work dirs.
pub const DEFAULT_BASE_DIR_NAME: &str = "treebench";

/// Compression level per codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLevels {
    /// Gzip level (0-9).
    pub gzip: u32,
    /// Raw deflate level (0-9).
    pub deflate: u32,
    /// Brotli quality (0-11).
    pub brotli: u32,
    /// Zstd level (1-22).
    pub zstd: u32,
    /// Zstd level of the delta codec (1-22).
    pub delta: u32,
}

impl Default for CodecLevels {
    fn default() -> Self {
        Self {
            gzip: 6,
            deflate: 6,
            brotli: 9,
            zstd: 3,
            delta: 3,
        }
    }
}

/// Configuration for a [`crate::Harness`].
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Parent directory for work directories created without an explicit path.
    pub base_dir: PathBuf,
    /// Per-codec compression levels.
    pub levels: CodecLevels,
    /// Buffer size for file readers and writers.
    pub buffer_size: usize,
}

impl HarnessConfig {
    /// Default configuration rooted at `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_dir: std::env::temp_dir().join(DEFAULT_BASE_DIR_NAME),
            levels: CodecLevels::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
