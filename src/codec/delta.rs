// Byte-level delta codec: zstd with the base file as a reference prefix
// (the format `zstd --patch-from` produces).
//
// The delta is a single zstd frame compressed as if the base immediately
// preceded the target, so every unchanged region becomes a back-reference into
// the base. The window is sized to cover base plus target, and the frame
// records the target size and a content checksum: applying a delta to the
// wrong base fails instead of producing garbage.
//
// The base is held in memory on both sides (it is the reference prefix); the
// target is read fully to size the window. Decoding streams its output, so the
// reconstructed size is not bounded by the delta or base size.

use std::io::{self, BufReader, Read, Write};

use super::{CodecError, CountingWriter, DeltaCodec};

pub const ZSTD_PATCH: &str = "zstd-patch";

const WINDOW_LOG_MIN: u32 = 10;

#[cfg(target_pointer_width = "64")]
const WINDOW_LOG_MAX: u32 = 31;
#[cfg(not(target_pointer_width = "64"))]
const WINDOW_LOG_MAX: u32 = 30;

/// Windows above this need long-distance matching to find base references.
const LONG_WINDOW_LOG: u32 = 27;

/// Delta codec built on zstd's reference-prefix mode.
#[derive(Debug, Clone, Copy)]
pub struct ZstdPatchCodec {
    level: i32,
}

impl ZstdPatchCodec {
    /// Create a delta codec with the given zstd level (1-22, clamped).
    pub fn new(level: u32) -> Self {
        Self {
            level: level.clamp(1, 22) as i32,
        }
    }
}

impl Default for ZstdPatchCodec {
    fn default() -> Self {
        Self::new(3)
    }
}

impl DeltaCodec for ZstdPatchCodec {
    fn name(&self) -> &'static str {
        ZSTD_PATCH
    }

    fn delta_encode(
        &self,
        base: &mut dyn Read,
        target: &mut dyn Read,
        delta: &mut dyn Write,
    ) -> Result<u64, CodecError> {
        let base = read_all(base)?;
        let target = read_all(target)?;
        let window_log = window_log_for(base.len() as u64 + target.len() as u64);

        let mut counter = CountingWriter::new(delta);
        let mut encoder =
            zstd::stream::write::Encoder::with_ref_prefix(&mut counter, self.level, &base)?;
        encoder.window_log(window_log)?;
        encoder.long_distance_matching(window_log > LONG_WINDOW_LOG)?;
        encoder.include_checksum(true)?;
        encoder.set_pledged_src_size(Some(target.len() as u64))?;
        encoder.write_all(&target)?;
        encoder.finish()?;

        Ok(counter.count())
    }

    fn delta_apply(
        &self,
        base: &mut dyn Read,
        delta: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<u64, CodecError> {
        let base = read_all(base)?;

        let mut counter = CountingWriter::new(output);
        let mut decoder = zstd::stream::read::Decoder::with_ref_prefix(BufReader::new(delta), &base)
            .map_err(|e| CodecError::from_decode(ZSTD_PATCH, e))?;
        decoder
            .window_log_max(WINDOW_LOG_MAX)
            .map_err(|e| CodecError::from_decode(ZSTD_PATCH, e))?;
        io::copy(&mut decoder, &mut counter).map_err(|e| CodecError::from_decode(ZSTD_PATCH, e))?;

        Ok(counter.count())
    }
}

/// Smallest window (log2) covering `span` bytes, within zstd's limits.
fn window_log_for(span: u64) -> u32 {
    let needed = u64::BITS - span.saturating_sub(1).leading_zeros();
    needed.clamp(WINDOW_LOG_MIN, WINDOW_LOG_MAX)
}

fn read_all(reader: &mut dyn Read) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
