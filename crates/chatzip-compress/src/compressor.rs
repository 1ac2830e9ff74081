use crate::error::CompressionError;

/// Maximum number of decompressed bytes accepted from one segment (64 KiB).
///
/// Chat messages are short; anything that inflates past this is either a
/// mistake or a decompression bomb. Every [`Compressor`] enforces the same
/// limit, incrementally, while output is produced.
pub const DECOMPRESSION_SIZE_LIMIT: usize = 64 * 1024;

/// A named text codec that can sit behind a registry identifier.
///
/// Implementations must be deterministic (the same text always compresses
/// to the same bytes) and must honour their configured output limit
/// during `decompress` without first materialising the whole output.
///
/// ```text
///   compress:    &str  ──UTF-8──▶ bytes ──codec──▶ Vec<u8>
///   decompress:  &[u8] ──codec──▶ bytes ──UTF-8──▶ String
///                              ▲
///                              └── running size checked against limit
/// ```
///
/// Both shipped variants allocate their engine state per call, so a
/// single instance can be shared across threads.
pub trait Compressor: Send + Sync {
    /// Short stable name, used in logs and by `chatzip inspect`.
    fn name(&self) -> &'static str;

    /// Compress `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompressionError`] if the underlying engine fails.
    fn compress(&self, text: &str) -> Result<Vec<u8>, CompressionError>;

    /// Decompress `data` back into text.
    ///
    /// # Errors
    ///
    /// - [`CompressionError::OutputTooLarge`] if the output passes the limit.
    /// - [`CompressionError::Malformed`] or a native variant if `data` is
    ///   not a valid stream.
    /// - [`CompressionError::InvalidUtf8`] if the output is not text.
    fn decompress(&self, data: &[u8]) -> Result<String, CompressionError>;
}
