use chatzip_compress::DECOMPRESSION_SIZE_LIMIT;
use chatzip_wire::alphabet::{STANDARD_BLACKLIST, STANDARD_FROM, STANDARD_TO};

/// Configuration for a [`MessageCodec`](crate::MessageCodec).
///
/// ```text
/// ┌───────────────────────┬──────────────────────────────────────────────┐
/// │ Field                 │ Purpose                                      │
/// ├───────────────────────┼──────────────────────────────────────────────┤
/// │ start_marker          │ Opens a compressed segment (`$!`)            │
/// │ end_marker            │ Closes a compressed segment (`!$`)           │
/// │ error_marker          │ Brackets inline decode errors (`!`)          │
/// │ alphabet_from / _to   │ Inclusive codepoint range of the alphabet    │
/// │ alphabet_blacklist    │ Codepoints dropped on top of category filter │
/// │ max_decompressed_size │ Per-segment decompression limit in bytes     │
/// └───────────────────────┴──────────────────────────────────────────────┘
/// ```
///
/// The alphabet fields decide how every segment parses. Two peers with
/// different alphabets cannot read each other's messages, so changing
/// them is a wire break.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    pub start_marker: String,
    pub end_marker: String,
    pub error_marker: char,
    pub alphabet_from: char,
    pub alphabet_to: char,
    pub alphabet_blacklist: Vec<char>,
    /// Used by [`MessageCodec::from_config`](crate::MessageCodec::from_config)
    /// when it builds the standard registry.
    pub max_decompressed_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            start_marker: "$!".to_owned(),
            end_marker: "!$".to_owned(),
            error_marker: '!',
            alphabet_from: STANDARD_FROM,
            alphabet_to: STANDARD_TO,
            alphabet_blacklist: STANDARD_BLACKLIST.to_vec(),
            max_decompressed_size: DECOMPRESSION_SIZE_LIMIT,
        }
    }
}

impl CodecConfig {
    /// Override the decompression limit.
    #[must_use]
    pub fn with_max_decompressed_size(mut self, limit: usize) -> Self {
        self.max_decompressed_size = limit;
        self
    }
}
