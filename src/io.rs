// File-level I/O helpers.
//
// Each helper opens its files with buffered readers/writers, runs exactly one
// codec call, flushes, and returns per-file statistics. The timer brackets the
// codec call and the final flush; opening files is not timed. With the
// `file-io` feature a SHA-256 of the produced file is computed as it is
// written.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::codec::{BlockCodec, DeltaCodec};
use crate::error::{HarnessError, Result};
use crate::result::FileStats;

/// Direction of a block codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Compress.
    Encode,
    /// Decompress.
    Decode,
}

// ---------------------------------------------------------------------------
// Block codecs
// ---------------------------------------------------------------------------

/// Run `codec` over `input_path`, writing to `output_path`.
///
/// Input bytes are the size of `input_path`.
pub fn transform_file(
    codec: &dyn BlockCodec,
    direction: Direction,
    input_path: &Path,
    output_path: &Path,
    buf_size: usize,
) -> Result<FileStats> {
    let input = File::open(input_path).map_err(HarnessError::io(input_path))?;
    let input_size = file_len(&input, input_path)?;
    let mut reader = BufReader::with_capacity(buf_size, input);

    let mut sink = OutputSink::create(output_path, buf_size)?;

    let start = Instant::now();
    let written = match direction {
        Direction::Encode => codec.encode(&mut reader, &mut sink),
        Direction::Decode => codec.decode(&mut reader, &mut sink),
    }
    .map_err(HarnessError::codec(input_path))?;
    sink.flush().map_err(HarnessError::io(output_path))?;
    let duration = start.elapsed();

    log::debug!(
        "{} {:?} {}: {input_size} -> {written} bytes in {duration:?}",
        codec.name(),
        direction,
        input_path.display()
    );

    Ok(FileStats {
        name: file_name(input_path),
        input_size,
        output_size: written,
        duration,
        output_sha256: sink.finish(),
    })
}

// ---------------------------------------------------------------------------
// Delta codec
// ---------------------------------------------------------------------------

/// Delta-encode `target_path` against `base_path`, writing the delta to
/// `delta_path`.
///
/// Input bytes are the size of the target file.
pub fn delta_encode_file(
    codec: &dyn DeltaCodec,
    base_path: &Path,
    target_path: &Path,
    delta_path: &Path,
    buf_size: usize,
) -> Result<FileStats> {
    let base = File::open(base_path).map_err(HarnessError::io(base_path))?;
    let target = File::open(target_path).map_err(HarnessError::io(target_path))?;
    let input_size = file_len(&target, target_path)?;
    let mut base_reader = BufReader::with_capacity(buf_size, base);
    let mut target_reader = BufReader::with_capacity(buf_size, target);

    let mut sink = OutputSink::create(delta_path, buf_size)?;

    let start = Instant::now();
    let written = codec
        .delta_encode(&mut base_reader, &mut target_reader, &mut sink)
        .map_err(HarnessError::codec(target_path))?;
    sink.flush().map_err(HarnessError::io(delta_path))?;
    let duration = start.elapsed();

    log::debug!(
        "{} encode {}: {input_size} -> {written} bytes in {duration:?}",
        codec.name(),
        target_path.display()
    );

    Ok(FileStats {
        name: file_name(target_path),
        input_size,
        output_size: written,
        duration,
        output_sha256: sink.finish(),
    })
}

/// Apply the delta at `delta_path` to `base_path`, writing the reconstruction
/// to `output_path`.
///
/// Input bytes are the size of the delta file.
pub fn delta_apply_file(
    codec: &dyn DeltaCodec,
    base_path: &Path,
    delta_path: &Path,
    output_path: &Path,
    buf_size: usize,
) -> Result<FileStats> {
    let base = File::open(base_path).map_err(HarnessError::io(base_path))?;
    let delta = File::open(delta_path).map_err(HarnessError::io(delta_path))?;
    let input_size = file_len(&delta, delta_path)?;
    let mut base_reader = BufReader::with_capacity(buf_size, base);
    let mut delta_reader = BufReader::with_capacity(buf_size, delta);

    let mut sink = OutputSink::create(output_path, buf_size)?;

    let start = Instant::now();
    let written = codec
        .delta_apply(&mut base_reader, &mut delta_reader, &mut sink)
        .map_err(HarnessError::codec(delta_path))?;
    sink.flush().map_err(HarnessError::io(output_path))?;
    let duration = start.elapsed();

    log::debug!(
        "{} apply {}: {input_size} -> {written} bytes in {duration:?}",
        codec.name(),
        delta_path.display()
    );

    Ok(FileStats {
        name: file_name(delta_path),
        input_size,
        output_size: written,
        duration,
        output_sha256: sink.finish(),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn file_len(file: &File, path: &Path) -> Result<u64> {
    Ok(file.metadata().map_err(HarnessError::io(path))?.len())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Buffered output file that hashes what it writes (with `file-io`).
struct OutputSink {
    writer: BufWriter<File>,
    #[cfg(feature = "file-io")]
    hasher: sha2::Sha256,
}

impl OutputSink {
    fn create(path: &Path, buf_size: usize) -> Result<Self> {
        let file = File::create(path).map_err(HarnessError::io(path))?;
        Ok(Self {
            writer: BufWriter::with_capacity(buf_size, file),
            #[cfg(feature = "file-io")]
            hasher: sha2::Sha256::new(),
        })
    }

    #[cfg(feature = "file-io")]
    fn finish(self) -> Option<[u8; 32]> {
        Some(self.hasher.finalize().into())
    }

    #[cfg(not(feature = "file-io"))]
    fn finish(self) -> Option<[u8; 32]> {
        None
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        #[cfg(feature = "file-io")]
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
