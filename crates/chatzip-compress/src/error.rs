use crate::dense::native::NativeFault;

/// Errors raised by a [`Compressor`](crate::Compressor) while compressing
/// or decompressing one segment.
///
/// Every variant is recoverable: it concerns a single call and leaves the
/// compressor usable.
///
/// ```text
///   CompressionError
///   ├── OutputTooLarge             ← decompressed size passed the limit
///   ├── Malformed                  ← body is not a valid stream for the codec
///   ├── InvalidUtf8                ← decompressed bytes are not UTF-8 text
///   ├── Deflate                    ← flate2 refused to compress
///   ├── NativeInitFailed           ← native instance could not be created
///   ├── NativeCompressionFailed    ← native encoder reported an error
///   └── NativeDecompressionFailed  ← native decoder reported an error
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    /// Decompression stopped because the output passed `limit` bytes.
    ///
    /// Raised as soon as the running total crosses the limit, never after
    /// the full output has been materialised.
    #[error("message is too long: decompressed size exceeds {limit} bytes")]
    OutputTooLarge { limit: usize },

    /// The compressed body could not be decoded.
    #[error("malformed {codec} data: {reason}")]
    Malformed { codec: &'static str, reason: String },

    /// Decompression succeeded but the result is not valid UTF-8.
    #[error("decompressed {codec} data is not valid UTF-8")]
    InvalidUtf8 { codec: &'static str },

    /// The deflate engine failed while compressing.
    #[error("deflate compression failed: {0}")]
    Deflate(String),

    /// The native library returned no instance.
    #[error("unable to initialize native {direction}")]
    NativeInitFailed { direction: &'static str },

    /// The native encoder rejected a parameter or a stream step.
    #[error("native compression failed: {0}")]
    NativeCompressionFailed(NativeFault),

    /// The native decoder reported an error or ran out of input.
    #[error("native decompression failed: {0}")]
    NativeDecompressionFailed(NativeFault),
}

/// Errors raised while building a [`CompressorRegistry`](crate::CompressorRegistry).
///
/// Configuration errors: they abort startup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no compressors registered")]
    Empty,

    /// Identifier 0 is reserved: a leading zero byte is indistinguishable
    /// from big-integer padding once the envelope has been through the
    /// radix conversion.
    #[error("compressor identifier must not be zero")]
    ReservedIdentifier,

    #[error("compressor identifier {id} registered twice")]
    DuplicateIdentifier { id: u8 },
}
