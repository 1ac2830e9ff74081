use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::buffer::GrowableBuffer;
use crate::compressor::{Compressor, DECOMPRESSION_SIZE_LIMIT};
use crate::error::CompressionError;

const CODEC_NAME: &str = "deflate";

/// Low-latency compressor: zlib-wrapped deflate at maximum effort.
///
/// A fresh `flate2` engine is created for every call and dropped when the
/// call returns. Nothing is carried between calls, so one instance can be
/// shared by any number of threads.
///
/// ```text
/// ┌──────────────┬─────────────────────────────────────────────┐
/// │ Format       │ zlib (RFC 1950) around raw deflate          │
/// │ Level        │ 9 (best)                                    │
/// │ Output limit │ DECOMPRESSION_SIZE_LIMIT unless overridden  │
/// └──────────────┴─────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug)]
pub struct FastCompressor {
    level: Compression,
    max_output: usize,
}

impl FastCompressor {
    pub fn new() -> Self {
        Self::with_limit(DECOMPRESSION_SIZE_LIMIT)
    }

    /// Same codec, different decompression limit.
    pub fn with_limit(max_output: usize) -> Self {
        Self {
            level: Compression::best(),
            max_output,
        }
    }
}

impl Default for FastCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for FastCompressor {
    fn name(&self) -> &'static str {
        CODEC_NAME
    }

    fn compress(&self, text: &str) -> Result<Vec<u8>, CompressionError> {
        let mut engine = Compress::new(self.level, true);
        let mut out = GrowableBuffer::unbounded();
        let mut input = text.as_bytes();

        loop {
            out.reserve_spare();
            let before = engine.total_in();
            let status = engine
                .compress_vec(input, out.as_mut_vec(), FlushCompress::Finish)
                .map_err(|e| CompressionError::Deflate(e.to_string()))?;
            input = &input[consumed(before, engine.total_in())..];

            if status == Status::StreamEnd {
                break;
            }
        }

        Ok(out.into_inner())
    }

    fn decompress(&self, data: &[u8]) -> Result<String, CompressionError> {
        let mut engine = Decompress::new(true);
        let mut out = GrowableBuffer::bounded(self.max_output);
        let mut input = data;

        loop {
            out.reserve_spare();
            let (before_in, before_out) = (engine.total_in(), engine.total_out());
            let status = engine
                .decompress_vec(input, out.as_mut_vec(), FlushDecompress::None)
                .map_err(|e| malformed(e.to_string()))?;
            input = &input[consumed(before_in, engine.total_in())..];

            out.check_limit()?;

            if status == Status::StreamEnd {
                break;
            }

            // Spare room was available, yet nothing moved: the stream
            // stopped before its end marker.
            let stalled = engine.total_in() == before_in && engine.total_out() == before_out;
            if stalled && out.spare_len() > 0 {
                return Err(malformed("unexpected end of stream".to_owned()));
            }
        }

        String::from_utf8(out.into_inner()).map_err(|_| CompressionError::InvalidUtf8 { codec: CODEC_NAME })
    }
}

fn malformed(reason: String) -> CompressionError {
    CompressionError::Malformed {
        codec: CODEC_NAME,
        reason,
    }
}

/// Bytes consumed by one engine step. The delta is bounded by the input
/// slice handed to that step, so it always fits in `usize`.
#[allow(clippy::cast_possible_truncation)]
fn consumed(before: u64, after: u64) -> usize {
    (after - before) as usize
}
