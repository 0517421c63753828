// Codec adapters: one uniform streaming interface over every external codec.
//
// - `block`: self-contained compressors (gzip, raw deflate, brotli, zstd)
// - `delta`: byte-level delta against a base file (zstd reference prefix)
//
// Every call reads its input fully and writes one complete output stream.
// There is no resumable state between calls: one call processes one file.

pub mod block;
pub mod delta;

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::config::CodecLevels;

pub use block::{BrotliCodec, DeflateCodec, GzipCodec, ZstdCodec};
pub use delta::ZstdPatchCodec;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error returned by a codec adapter.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The codec rejected its input (bad magic, corrupt stream, corrupt delta).
    #[error("{codec} rejected input: {reason}")]
    Rejected {
        /// Name of the codec that failed.
        codec: &'static str,
        /// Codec-provided description.
        reason: String,
    },
}

impl CodecError {
    /// Classify an error raised while a decoder was pulling its input.
    ///
    /// Decoders surface malformed streams as `io::Error`s of these kinds.
    pub(crate) fn from_decode(codec: &'static str, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::Other => Self::Rejected {
                codec,
                reason: e.to_string(),
            },
            _ => Self::Io(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Codec traits
// ---------------------------------------------------------------------------

/// A self-contained compressor operating on a single stream.
///
/// Implementations return the number of bytes written to `output`.
pub trait BlockCodec: Send + Sync {
    /// Short lowercase codec name (used in output directory names and logs).
    fn name(&self) -> &'static str;

    /// Compress `input` into `output`.
    fn encode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError>;

    /// Decompress `input` into `output`.
    fn decode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError>;

    /// In-memory convenience wrapper around [`BlockCodec::encode`].
    fn encode_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut input = data;
        let mut out = Vec::new();
        self.encode(&mut input, &mut out)?;
        Ok(out)
    }

    /// In-memory convenience wrapper around [`BlockCodec::decode`].
    fn decode_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut input = data;
        let mut out = Vec::new();
        self.decode(&mut input, &mut out)?;
        Ok(out)
    }
}

/// A delta codec: describes `target` relative to `base`, and reverses it.
pub trait DeltaCodec: Send + Sync {
    /// Short lowercase codec name.
    fn name(&self) -> &'static str;

    /// Write a delta that transforms `base` into `target`.
    fn delta_encode(
        &self,
        base: &mut dyn Read,
        target: &mut dyn Read,
        delta: &mut dyn Write,
    ) -> Result<u64, CodecError>;

    /// Reconstruct the target from `base` and a delta produced by `delta_encode`.
    fn delta_apply(
        &self,
        base: &mut dyn Read,
        delta: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<u64, CodecError>;

    /// In-memory convenience wrapper around [`DeltaCodec::delta_encode`].
    fn encode_bytes(&self, base: &[u8], target: &[u8]) -> Result<Vec<u8>, CodecError> {
        let (mut base, mut target) = (base, target);
        let mut out = Vec::new();
        self.delta_encode(&mut base, &mut target, &mut out)?;
        Ok(out)
    }

    /// In-memory convenience wrapper around [`DeltaCodec::delta_apply`].
    fn apply_bytes(&self, base: &[u8], delta: &[u8]) -> Result<Vec<u8>, CodecError> {
        let (mut base, mut delta) = (base, delta);
        let mut out = Vec::new();
        self.delta_apply(&mut base, &mut delta, &mut out)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Codec kinds
// ---------------------------------------------------------------------------

/// The closed set of block compressors the harness can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodecKind {
    /// Gzip container around deflate.
    Gzip,
    /// Raw deflate, no container.
    Deflate,
    /// Brotli.
    Brotli,
    /// Zstandard.
    Zstd,
}

impl CodecKind {
    /// Every block codec, in presentation order.
    pub const ALL: [CodecKind; 4] = [Self::Gzip, Self::Deflate, Self::Brotli, Self::Zstd];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gzip => block::GZIP,
            Self::Deflate => block::DEFLATE,
            Self::Brotli => block::BROTLI,
            Self::Zstd => block::ZSTD,
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown codec name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown codec '{0}' (expected gzip, deflate, brotli or zstd)")]
pub struct UnknownCodec(pub String);

impl FromStr for CodecKind {
    type Err = UnknownCodec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(Self::Gzip),
            "deflate" => Ok(Self::Deflate),
            "brotli" | "br" => Ok(Self::Brotli),
            "zstd" | "zst" => Ok(Self::Zstd),
            _ => Err(UnknownCodec(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Codec set
// ---------------------------------------------------------------------------

/// One codec implementation per [`CodecKind`], plus the delta codec.
///
/// Built from [`CodecLevels`]; any entry can be swapped for a caller-provided
/// implementation (for example an instrumented wrapper).
#[derive(Clone)]
pub struct CodecSet {
    gzip: Arc<dyn BlockCodec>,
    deflate: Arc<dyn BlockCodec>,
    brotli: Arc<dyn BlockCodec>,
    zstd: Arc<dyn BlockCodec>,
    delta: Arc<dyn DeltaCodec>,
}

impl CodecSet {
    /// Build the standard codecs at the given levels.
    pub fn from_levels(levels: &CodecLevels) -> Self {
        Self {
            gzip: Arc::new(GzipCodec::new(levels.gzip)),
            deflate: Arc::new(DeflateCodec::new(levels.deflate)),
            brotli: Arc::new(BrotliCodec::new(levels.brotli)),
            zstd: Arc::new(ZstdCodec::new(levels.zstd)),
            delta: Arc::new(ZstdPatchCodec::new(levels.delta)),
        }
    }

    /// The block codec registered for `kind`.
    pub fn block(&self, kind: CodecKind) -> &dyn BlockCodec {
        match kind {
            CodecKind::Gzip => self.gzip.as_ref(),
            CodecKind::Deflate => self.deflate.as_ref(),
            CodecKind::Brotli => self.brotli.as_ref(),
            CodecKind::Zstd => self.zstd.as_ref(),
        }
    }

    /// The delta codec.
    pub fn delta(&self) -> &dyn DeltaCodec {
        self.delta.as_ref()
    }

    /// Replace the block codec used for `kind`.
    pub fn with_block(mut self, kind: CodecKind, codec: Arc<dyn BlockCodec>) -> Self {
        match kind {
            CodecKind::Gzip => self.gzip = codec,
            CodecKind::Deflate => self.deflate = codec,
            CodecKind::Brotli => self.brotli = codec,
            CodecKind::Zstd => self.zstd = codec,
        }
        self
    }

    /// Replace the delta codec.
    pub fn with_delta(mut self, codec: Arc<dyn DeltaCodec>) -> Self {
        self.delta = codec;
        self
    }
}

impl Default for CodecSet {
    fn default() -> Self {
        Self::from_levels(&CodecLevels::default())
    }
}

impl fmt::Debug for CodecSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecSet")
            .field("gzip", &self.gzip.name())
            .field("deflate", &self.deflate.name())
            .field("brotli", &self.brotli.name())
            .field("zstd", &self.zstd.name())
            .field("delta", &self.delta.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Counting writer
// ---------------------------------------------------------------------------

/// Write adapter that counts the bytes accepted by the inner writer.
pub(crate) struct CountingWriter<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_kind_parse_and_display() {
        for kind in CodecKind::ALL {
            assert_eq!(kind.name().parse::<CodecKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.name());
        }
        assert_eq!("GZ".parse::<CodecKind>().unwrap(), CodecKind::Gzip);
        assert_eq!(" br ".parse::<CodecKind>().unwrap(), CodecKind::Brotli);
        assert!("lzma".parse::<CodecKind>().is_err());
    }

    #[test]
    fn codec_set_dispatches_by_kind() {
        let set = CodecSet::default();
        for kind in CodecKind::ALL {
            assert_eq!(set.block(kind).name(), kind.name());
        }
        assert_eq!(set.delta().name(), delta::ZSTD_PATCH);
    }

    #[test]
    fn codec_set_override_replaces_single_entry() {
        let set = CodecSet::default().with_block(CodecKind::Gzip, Arc::new(ZstdCodec::new(1)));
        assert_eq!(set.block(CodecKind::Gzip).name(), "zstd");
        assert_eq!(set.block(CodecKind::Deflate).name(), "deflate");
    }

    #[test]
    fn counting_writer_counts_accepted_bytes() {
        let mut sink = Vec::new();
        let mut w = CountingWriter::new(&mut sink);
        w.write_all(b"hello").unwrap();
        w.write_all(b", world").unwrap();
        assert_eq!(w.count(), 12);
        assert_eq!(sink, b"hello, world");
    }

    #[test]
    fn decode_errors_are_classified() {
        let e = CodecError::from_decode("gzip", io::Error::from(io::ErrorKind::InvalidInput));
        assert!(matches!(e, CodecError::Rejected { codec: "gzip", .. }));
        let e = CodecError::from_decode("gzip", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(e, CodecError::Io(_)));
    }
}
