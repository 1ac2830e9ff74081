use chatzip_compress::{CompressionError, RegistryError};
use chatzip_wire::{AlphabetError, InvalidSymbol};

/// Errors raised while building a [`MessageCodec`](crate::MessageCodec).
///
/// All of these are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),

    #[error("invalid compressor registry: {0}")]
    Registry(#[from] RegistryError),

    /// A segment marker is unusable.
    #[error("invalid delimiter: {reason}")]
    InvalidDelimiter { reason: &'static str },

    /// The segment pattern built from the markers did not compile.
    #[error("segment pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised while encoding one segment.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("{compressor} compression failed: {source}")]
    Compression {
        compressor: &'static str,
        #[source]
        source: CompressionError,
    },
}

/// Errors raised while decoding one segment.
///
/// Every variant is local to a single segment. `decode_message` renders
/// them inline and carries on with the rest of the text.
///
/// ```text
///   DecodeError
///   ├── InvalidCharacter     ← symbol outside the alphabet
///   ├── MalformedEnvelope    ← no symbols, so no bytes at all
///   ├── EnvelopeTooSmall     ← no identifier byte after padding
///   ├── UnknownCompressor    ← identifier not in the registry
///   └── Decompression        ← the compressor rejected the body
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected character {symbol:?} at position {position}")]
    InvalidCharacter { symbol: char, position: usize },

    #[error("malformed message: no envelope bytes")]
    MalformedEnvelope,

    #[error("message is too small: missing compressor identifier")]
    EnvelopeTooSmall,

    #[error("unknown compressor {id}")]
    UnknownCompressor { id: u8 },

    #[error(transparent)]
    Decompression(#[from] CompressionError),
}

impl From<InvalidSymbol> for DecodeError {
    fn from(e: InvalidSymbol) -> Self {
        Self::InvalidCharacter {
            symbol: e.symbol,
            position: e.position,
        }
    }
}
