// Operation results.
//
// An `OperationResult` summarizes one batch of per-file codec calls. It is
// immutable once built; the harness caches it by output directory path.

use std::time::Duration;

/// Statistics for one file processed by an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    /// File name (identical in the input and output directories).
    pub name: String,
    /// Bytes counted as input for this file.
    pub input_size: u64,
    /// Bytes written to the output file.
    pub output_size: u64,
    /// Time spent in the codec call, including the final output flush.
    pub duration: Duration,
    /// SHA-256 of the produced file (if the `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

/// Aggregate outcome of one operation over a directory or directory pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    duration: Duration,
    success: bool,
    ratio: Option<f64>,
    output_size: u64,
    input_size: u64,
    files: Vec<FileStats>,
}

impl OperationResult {
    /// The "no such result" sentinel: zero duration, unsuccessful, ratio 0, size 0.
    pub fn empty() -> Self {
        Self {
            duration: Duration::ZERO,
            success: false,
            ratio: Some(0.0),
            output_size: 0,
            input_size: 0,
            files: Vec::new(),
        }
    }

    /// Aggregate per-file statistics into a successful result.
    ///
    /// Duration is the sum of per-file durations. The ratio is undefined
    /// (`None`) when no input bytes were processed.
    pub fn from_files(files: Vec<FileStats>) -> Self {
        let duration = files.iter().map(|f| f.duration).sum();
        let input_size = files.iter().map(|f| f.input_size).sum();
        let output_size = files.iter().map(|f| f.output_size).sum();
        Self {
            duration,
            success: true,
            ratio: ratio(output_size, input_size),
            output_size,
            input_size,
            files,
        }
    }

    /// Sum of per-file codec durations.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the operation ran. `false` only for the empty sentinel.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Output bytes divided by input bytes; `None` when input was empty.
    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    /// Total bytes written.
    pub fn output_size(&self) -> u64 {
        self.output_size
    }

    /// Total bytes consumed as input.
    pub fn input_size(&self) -> u64 {
        self.input_size
    }

    /// Per-file statistics, in processing order.
    pub fn files(&self) -> &[FileStats] {
        &self.files
    }

    /// Whether this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

impl Default for OperationResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// `output / input`, undefined when `input` is zero.
pub fn ratio(output: u64, input: u64) -> Option<f64> {
    if input == 0 {
        None
    } else {
        Some(output as f64 / input as f64)
    }
}
