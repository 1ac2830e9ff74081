pub mod libzstd;
pub mod native;

use crate::buffer::GrowableBuffer;
use crate::compressor::{Compressor, DECOMPRESSION_SIZE_LIMIT};
use crate::error::CompressionError;

use self::libzstd::LibZstd;
use self::native::{
    EncoderMode, EncoderParameter, NativeEncoder, NativeInstance, NativeLibrary, NativeStream,
    StreamStatus,
};

const CODEC_NAME: &str = "zstd";

/// High-ratio compressor driving a streaming native library.
///
/// Every call runs the same state machine against a brand-new native
/// instance:
///
/// ```text
///   Init ──▶ Configure (encoder only) ──▶ ┌─▶ Step ──▶ Drain ─┐
///                                         └──── not done ◀───┘
///                                                  │ Finished
///                                                  ▼
///                                               Teardown
/// ```
///
/// - **Init**: `create_*` returning nothing → [`CompressionError::NativeInitFailed`].
/// - **Configure**: text mode and the library's maximum quality.
/// - **Step/Drain**: all remaining input is offered on every step; after
///   each step every available output chunk is copied into a doubling
///   buffer. The decoder checks the output limit after every chunk.
/// - **Teardown**: owned by [`NativeInstance`], so it runs exactly once on
///   every exit path.
///
/// No state outlives a call, which makes concurrent use from several
/// threads safe without locking.
pub struct DenseCompressor<L: NativeLibrary = LibZstd> {
    library: L,
    max_output: usize,
}

impl DenseCompressor<LibZstd> {
    pub fn new() -> Self {
        Self::with_library(LibZstd, DECOMPRESSION_SIZE_LIMIT)
    }

    /// Same codec, different decompression limit.
    pub fn with_limit(max_output: usize) -> Self {
        Self::with_library(LibZstd, max_output)
    }
}

impl Default for DenseCompressor<LibZstd> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: NativeLibrary> DenseCompressor<L> {
    pub fn with_library(library: L, max_output: usize) -> Self {
        Self {
            library,
            max_output,
        }
    }

    fn compress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let mut encoder = NativeInstance::acquire(self.library.create_encoder())
            .ok_or(CompressionError::NativeInitFailed { direction: "encoder" })?;

        let stream = encoder.live().map_err(CompressionError::NativeCompressionFailed)?;
        for parameter in [
            EncoderParameter::Mode(EncoderMode::Text),
            EncoderParameter::Quality(L::MAX_QUALITY),
        ] {
            stream
                .set_parameter(parameter)
                .map_err(CompressionError::NativeCompressionFailed)?;
        }

        let mut input = data;
        let mut out = GrowableBuffer::unbounded();

        loop {
            let status = encoder
                .step(&mut input)
                .map_err(CompressionError::NativeCompressionFailed)?;

            let stream = encoder.live().map_err(CompressionError::NativeCompressionFailed)?;
            while stream.has_more_output() {
                out.reserve_spare();
                let chunk = stream.take_output(out.spare_len());
                out.extend_from_slice(chunk);
            }

            if status == StreamStatus::Finished {
                break;
            }
        }

        Ok(out.into_inner())
    }

    fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        if let Some(declared) = self.library.declared_size(data)
            && !usize::try_from(declared).is_ok_and(|size| size <= self.max_output)
        {
            return Err(CompressionError::OutputTooLarge { limit: self.max_output });
        }

        let mut decoder = NativeInstance::acquire(self.library.create_decoder(self.max_output))
            .ok_or(CompressionError::NativeInitFailed { direction: "decoder" })?;

        let mut input = data;
        let mut out = GrowableBuffer::bounded(self.max_output);

        loop {
            let status = decoder
                .step(&mut input)
                .map_err(CompressionError::NativeDecompressionFailed)?;

            let stream = decoder.live().map_err(CompressionError::NativeDecompressionFailed)?;
            while stream.has_more_output() {
                out.reserve_spare();
                let chunk = stream.take_output(out.spare_len());
                out.extend_from_slice(chunk);
                out.check_limit()?;
            }

            match status {
                StreamStatus::Finished => break,
                StreamStatus::NeedsMoreOutput => {}
                // The whole body was supplied up front; asking for more
                // means the stream was cut short.
                StreamStatus::NeedsMoreInput => {
                    return Err(CompressionError::NativeDecompressionFailed(
                        native::NativeFault("truncated stream"),
                    ));
                }
            }
        }

        Ok(out.into_inner())
    }
}

impl<L: NativeLibrary> Compressor for DenseCompressor<L> {
    fn name(&self) -> &'static str {
        CODEC_NAME
    }

    fn compress(&self, text: &str) -> Result<Vec<u8>, CompressionError> {
        self.compress_bytes(text.as_bytes())
    }

    fn decompress(&self, data: &[u8]) -> Result<String, CompressionError> {
        let bytes = self.decompress_bytes(data)?;
        String::from_utf8(bytes).map_err(|_| CompressionError::InvalidUtf8 { codec: CODEC_NAME })
    }
}
