// Block compressors.
//
// Each codec wraps an external library behind `BlockCodec`:
//   - gzip and raw deflate via flate2
//   - brotli via the pure-Rust brotli crate
//   - zstd via the zstd crate (libzstd bindings)

use std::io::{self, Read, Write};

use flate2::Compression;

use super::{BlockCodec, CodecError, CountingWriter};

pub const GZIP: &str = "gzip";
pub const DEFLATE: &str = "deflate";
pub const BROTLI: &str = "brotli";
pub const ZSTD: &str = "zstd";

/// Brotli window size (log2). 22 is the library default.
const BROTLI_LGWIN: i32 = 22;

// ---------------------------------------------------------------------------
// Gzip
// ---------------------------------------------------------------------------

/// Gzip (RFC 1952) compressor.
#[derive(Debug, Clone, Copy)]
pub struct GzipCodec {
    level: Compression,
}

impl GzipCodec {
    /// Create a gzip codec with the given level (0-9, clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self::new(6)
    }
}

impl BlockCodec for GzipCodec {
    fn name(&self) -> &'static str {
        GZIP
    }

    fn encode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        use flate2::write::GzEncoder;

        let mut counter = CountingWriter::new(output);
        let mut encoder = GzEncoder::new(&mut counter, self.level);
        io::copy(input, &mut encoder)?;
        encoder.finish()?;
        Ok(counter.count())
    }

    fn decode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        use flate2::read::GzDecoder;

        let mut counter = CountingWriter::new(output);
        let mut decoder = GzDecoder::new(input);
        io::copy(&mut decoder, &mut counter).map_err(|e| CodecError::from_decode(GZIP, e))?;
        Ok(counter.count())
    }
}

// ---------------------------------------------------------------------------
// Raw deflate
// ---------------------------------------------------------------------------

/// Raw deflate (RFC 1951) compressor, no zlib or gzip framing.
#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec {
    level: Compression,
}

impl DeflateCodec {
    /// Create a deflate codec with the given level (0-9, clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new(6)
    }
}

impl BlockCodec for DeflateCodec {
    fn name(&self) -> &'static str {
        DEFLATE
    }

    fn encode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        use flate2::write::DeflateEncoder;

        let mut counter = CountingWriter::new(output);
        let mut encoder = DeflateEncoder::new(&mut counter, self.level);
        io::copy(input, &mut encoder)?;
        encoder.finish()?;
        Ok(counter.count())
    }

    fn decode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        use flate2::read::DeflateDecoder;

        let mut counter = CountingWriter::new(output);
        let mut decoder = DeflateDecoder::new(input);
        io::copy(&mut decoder, &mut counter).map_err(|e| CodecError::from_decode(DEFLATE, e))?;
        Ok(counter.count())
    }
}

// ---------------------------------------------------------------------------
// Brotli
// ---------------------------------------------------------------------------

/// Brotli (RFC 7932) compressor.
#[derive(Debug, Clone, Copy)]
pub struct BrotliCodec {
    quality: u32,
}

impl BrotliCodec {
    /// Create a brotli codec with the given quality (0-11, clamped).
    pub fn new(quality: u32) -> Self {
        Self {
            quality: quality.min(11),
        }
    }
}

impl Default for BrotliCodec {
    fn default() -> Self {
        Self::new(9)
    }
}

impl BlockCodec for BrotliCodec {
    fn name(&self) -> &'static str {
        BROTLI
    }

    fn encode(&self, mut input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        let mut params = brotli::enc::BrotliEncoderParams::default();
        params.quality = self.quality as i32;
        params.lgwin = BROTLI_LGWIN;
        let mut counter = CountingWriter::new(output);
        brotli::BrotliCompress(&mut input, &mut counter, &params)?;
        Ok(counter.count())
    }

    fn decode(&self, mut input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        let mut counter = CountingWriter::new(output);
        brotli::BrotliDecompress(&mut input, &mut counter)
            .map_err(|e| CodecError::from_decode(BROTLI, e))?;
        Ok(counter.count())
    }
}

// ---------------------------------------------------------------------------
// Zstd
// ---------------------------------------------------------------------------

/// Zstandard (RFC 8878) compressor.
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    /// Create a zstd codec with the given level (1-22, clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.clamp(1, 22) as i32,
        }
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::new(3)
    }
}

impl BlockCodec for ZstdCodec {
    fn name(&self) -> &'static str {
        ZSTD
    }

    fn encode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        let mut counter = CountingWriter::new(output);
        zstd::stream::copy_encode(input, &mut counter, self.level)?;
        Ok(counter.count())
    }

    fn decode(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<u64, CodecError> {
        let mut counter = CountingWriter::new(output);
        zstd::stream::copy_decode(input, &mut counter)
            .map_err(|e| CodecError::from_decode(ZSTD, e))?;
        Ok(counter.count())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
