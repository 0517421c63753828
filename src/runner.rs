// Operation runner.
//
// Drives one codec over every file of a directory (or every matched pair of
// two directories), strictly one file at a time, and aggregates the per-file
// statistics into an `OperationResult`. The first codec failure aborts the
// whole batch.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::codec::{CodecKind, CodecSet};
use crate::error::Result;
use crate::io::{self, Direction};
use crate::matcher::{self, FilePair};
use crate::result::{FileStats, OperationResult};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Kind of operation; also names its output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Compress every file of one tree.
    Compress(CodecKind),
    /// Decompress every file of one tree.
    Decompress(CodecKind),
    /// Delta-encode a target tree against a base tree.
    DeltaEncode,
    /// Apply a delta tree to a base tree.
    DeltaDecode,
}

impl Operation {
    /// Name of the output directory this operation writes into.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Compress(CodecKind::Gzip) => "gzip-encode",
            Self::Decompress(CodecKind::Gzip) => "gzip-decode",
            Self::Compress(CodecKind::Deflate) => "deflate-encode",
            Self::Decompress(CodecKind::Deflate) => "deflate-decode",
            Self::Compress(CodecKind::Brotli) => "brotli-encode",
            Self::Decompress(CodecKind::Brotli) => "brotli-decode",
            Self::Compress(CodecKind::Zstd) => "zstd-encode",
            Self::Decompress(CodecKind::Zstd) => "zstd-decode",
            Self::DeltaEncode => "delta-encode",
            Self::DeltaDecode => "delta-decode",
        }
    }

    /// Whether the operation works on two trees.
    pub fn is_delta(self) -> bool {
        matches!(self, Self::DeltaEncode | Self::DeltaDecode)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// An operation bound to its input directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job<'p> {
    Compress { codec: CodecKind, source: &'p Path },
    Decompress { codec: CodecKind, source: &'p Path },
    DeltaEncode { base: &'p Path, target: &'p Path },
    DeltaDecode { base: &'p Path, delta: &'p Path },
}

impl<'p> Job<'p> {
    pub fn operation(&self) -> Operation {
        match *self {
            Self::Compress { codec, .. } => Operation::Compress(codec),
            Self::Decompress { codec, .. } => Operation::Decompress(codec),
            Self::DeltaEncode { .. } => Operation::DeltaEncode,
            Self::DeltaDecode { .. } => Operation::DeltaDecode,
        }
    }

    /// Directory the output directory is nested in.
    ///
    /// The source tree for single-tree jobs, the base tree for delta encoding
    /// and the delta tree for delta decoding.
    pub fn anchor(&self) -> &'p Path {
        match *self {
            Self::Compress { source, .. } | Self::Decompress { source, .. } => source,
            Self::DeltaEncode { base, .. } => base,
            Self::DeltaDecode { delta, .. } => delta,
        }
    }

    /// Output directory path for this job.
    pub fn output_dir(&self) -> PathBuf {
        self.anchor().join(self.operation().dir_name())
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs jobs against a codec set.
pub struct OperationRunner<'c> {
    codecs: &'c CodecSet,
    buf_size: usize,
}

impl<'c> OperationRunner<'c> {
    pub fn new(codecs: &'c CodecSet, buf_size: usize) -> Self {
        Self { codecs, buf_size }
    }

    /// Run `job`, writing one output file per processed input into
    /// `output_dir` (which must exist).
    pub fn run(&self, job: &Job<'_>, output_dir: &Path) -> Result<OperationResult> {
        let buf = self.buf_size;
        let files = match *job {
            Job::Compress { codec, source } => {
                let codec = self.codecs.block(codec);
                drive(&matcher::list_files(source)?, output_dir, file_name, |input, out| {
                    io::transform_file(codec, Direction::Encode, input, out, buf)
                })?
            }
            Job::Decompress { codec, source } => {
                let codec = self.codecs.block(codec);
                drive(&matcher::list_files(source)?, output_dir, file_name, |input, out| {
                    io::transform_file(codec, Direction::Decode, input, out, buf)
                })?
            }
            Job::DeltaEncode { base, target } => {
                let codec = self.codecs.delta();
                let pairs = pair_up(base, target)?;
                drive(&pairs, output_dir, pair_name, |pair, out| {
                    io::delta_encode_file(codec, &pair.base, &pair.counterpart, out, buf)
                })?
            }
            Job::DeltaDecode { base, delta } => {
                let codec = self.codecs.delta();
                let pairs = pair_up(base, delta)?;
                drive(&pairs, output_dir, pair_name, |pair, out| {
                    io::delta_apply_file(codec, &pair.base, &pair.counterpart, out, buf)
                })?
            }
        };
        Ok(OperationResult::from_files(files))
    }
}

/// Apply `step` to every item in order, writing each output to
/// `output_dir/<name>`. Stops at the first error.
fn drive<T>(
    items: &[T],
    output_dir: &Path,
    name: impl Fn(&T) -> Option<&OsStr>,
    step: impl Fn(&T, &Path) -> Result<FileStats>,
) -> Result<Vec<FileStats>> {
    let mut files = Vec::with_capacity(items.len());
    for item in items {
        let Some(name) = name(item) else { continue };
        let out = output_dir.join(name);
        files.push(step(item, &out)?);
    }
    Ok(files)
}

fn file_name(path: &PathBuf) -> Option<&OsStr> {
    path.file_name()
}

fn pair_name(pair: &FilePair) -> Option<&OsStr> {
    Some(pair.name.as_os_str())
}

fn pair_up(base: &Path, other: &Path) -> Result<Vec<FilePair>> {
    let pairing = matcher::match_directories(base, other)?;
    if !pairing.unmatched.is_empty() {
        log::debug!(
            "{} of {} files in {} have no counterpart in {}",
            pairing.unmatched.len(),
            pairing.unmatched.len() + pairing.pairs.len(),
            base.display(),
            other.display()
        );
    }
    Ok(pairing.pairs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
