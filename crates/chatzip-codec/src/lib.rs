#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod scanner;

mod envelope;

pub use config::CodecConfig;
pub use error::{ConfigError, DecodeError, EncodeError};
pub use scanner::SegmentScanner;

use std::convert::Infallible;

use chatzip_compress::CompressorRegistry;
use chatzip_wire::alphabet::is_visible_category;
use chatzip_wire::{AlphabetTable, radix};

/// Embeds compressed text in chat messages and recovers it.
///
/// ```text
///   encode_segment:
///     text ──compress (highest id)──▶ body
///          ──[id ‖ body]──▶ big-endian integer ──÷ base──▶ symbols (LSD first)
///
///   decode_segment:
///     symbols ──Σ digit·baseⁱ──▶ integer ──▶ minimal big-endian bytes
///             ──skip 0x00 pad──▶ [id ‖ body] ──lookup(id).decompress──▶ text
/// ```
///
/// `encode_message`/`decode_message` apply the segment operations to every
/// `$!…!$` span of a larger text.
///
/// Read-only after construction and `Send + Sync`; share it behind an `Arc`.
pub struct MessageCodec {
    alphabet: AlphabetTable,
    registry: CompressorRegistry,
    scanner: SegmentScanner,
    error_marker: char,
}

impl std::fmt::Debug for MessageCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCodec")
            .field("base", &self.alphabet.base())
            .field("registry", &self.registry)
            .field("start", &self.scanner.start())
            .field("end", &self.scanner.end())
            .field("error_marker", &self.error_marker)
            .finish()
    }
}

/// What a segment contains, read without decompressing it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SegmentInfo {
    /// Compressor identifier carried by the envelope.
    pub identifier: u8,
    /// Name of the registered compressor, if the identifier is known.
    pub compressor: Option<&'static str>,
    /// Length of the compressed body in bytes.
    pub body_len: usize,
    /// Number of alphabet symbols in the encoded segment.
    pub symbols: usize,
}

impl MessageCodec {
    /// Build a codec from a configuration and a compressor registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the alphabet is too small or the markers
    /// are unusable.
    pub fn new(config: &CodecConfig, registry: CompressorRegistry) -> Result<Self, ConfigError> {
        let blacklist = &config.alphabet_blacklist;
        let alphabet = AlphabetTable::build(config.alphabet_from, config.alphabet_to, |ch| {
            !blacklist.contains(&ch) && is_visible_category(ch)
        })?;
        let scanner = SegmentScanner::new(&config.start_marker, &config.end_marker)?;

        log::debug!(
            "message codec ready: base {}, {} compressors, markers {:?} {:?}",
            alphabet.base(),
            registry.len(),
            scanner.start(),
            scanner.end()
        );

        Ok(Self {
            alphabet,
            registry,
            scanner,
            error_marker: config.error_marker,
        })
    }

    /// [`new`](Self::new) with the standard registry bounded by
    /// `config.max_decompressed_size`.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_config(config: &CodecConfig) -> Result<Self, ConfigError> {
        Self::new(
            config,
            CompressorRegistry::standard(config.max_decompressed_size),
        )
    }

    /// Default configuration and the standard registry.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn standard() -> Result<Self, ConfigError> {
        Self::from_config(&CodecConfig::default())
    }

    pub fn alphabet(&self) -> &AlphabetTable {
        &self.alphabet
    }

    pub fn registry(&self) -> &CompressorRegistry {
        &self.registry
    }

    pub fn scanner(&self) -> &SegmentScanner {
        &self.scanner
    }

    /// Compress `text` with the newest compressor and encode the envelope
    /// as an alphabet string. Markers are not added.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Compression`] if the compressor fails.
    pub fn encode_segment(&self, text: &str) -> Result<String, EncodeError> {
        let (id, compressor) = self.registry.highest();
        let body = compressor
            .compress(text)
            .map_err(|source| EncodeError::Compression {
                compressor: compressor.name(),
                source,
            })?;

        let encoded = radix::encode(&envelope::build(id, &body), &self.alphabet);
        log::debug!(
            "encoded segment with {}: {} text bytes -> {} body bytes -> {} symbols",
            compressor.name(),
            text.len(),
            body.len(),
            encoded.chars().count()
        );
        Ok(encoded)
    }

    /// Decode an alphabet string produced by [`encode_segment`](Self::encode_segment).
    ///
    /// # Errors
    ///
    /// Every failure is a [`DecodeError`] scoped to this segment.
    pub fn decode_segment(&self, encoded: &str) -> Result<String, DecodeError> {
        let bytes = radix::decode(encoded, &self.alphabet)?;
        let (id, body) = envelope::parse(&bytes)?;
        let compressor = self
            .registry
            .lookup(id)
            .ok_or(DecodeError::UnknownCompressor { id })?;
        Ok(compressor.decompress(body)?)
    }

    /// Parse a segment's envelope without decompressing the body.
    ///
    /// An unregistered identifier is reported through
    /// [`SegmentInfo::compressor`] rather than as an error.
    ///
    /// # Errors
    ///
    /// Fails on the same symbol and envelope errors as
    /// [`decode_segment`](Self::decode_segment).
    pub fn inspect_segment(&self, encoded: &str) -> Result<SegmentInfo, DecodeError> {
        let bytes = radix::decode(encoded, &self.alphabet)?;
        let (identifier, body) = envelope::parse(&bytes)?;
        Ok(SegmentInfo {
            identifier,
            compressor: self.registry.lookup(identifier).map(|c| c.name()),
            body_len: body.len(),
            symbols: encoded.chars().count(),
        })
    }

    /// Encode the inner content of every segment in `text`, keeping the
    /// markers. Text outside segments is unchanged.
    ///
    /// # Errors
    ///
    /// The first segment that fails to encode aborts the whole message.
    pub fn encode_message(&self, text: &str) -> Result<String, EncodeError> {
        self.scanner
            .try_replace(text, |inner| self.encode_segment(inner))
    }

    /// Replace every segment, markers included, with its decoded text.
    ///
    /// A segment that fails to decode is replaced with the error
    /// description between two error markers (`!…!`), and the rest of
    /// the message is still processed. Never fails.
    pub fn decode_message(&self, text: &str) -> String {
        let Ok(decoded) = self.scanner.try_replace(text, |inner| {
            Ok::<_, Infallible>(match self.decode_segment(inner) {
                Ok(plain) => plain,
                Err(e) => {
                    log::warn!("segment failed to decode: {e}");
                    format!("{marker}{e}{marker}", marker = self.error_marker)
                }
            })
        });
        decoded
    }

    /// Wrap `text` in markers after encoding it as a single segment.
    ///
    /// # Errors
    ///
    /// See [`encode_segment`](Self::encode_segment).
    pub fn encode_wrapped(&self, text: &str) -> Result<String, EncodeError> {
        Ok(self.scanner.wrap(&self.encode_segment(text)?))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chatzip_compress::{
        CompressionError, Compressor, DENSE_ID, FAST_ID, FastCompressor,
    };

    use super::*;

    fn codec() -> MessageCodec {
        MessageCodec::standard().unwrap()
    }

    /// A codec whose registry only knows the fast compressor.
    fn fast_only() -> MessageCodec {
        let registry = CompressorRegistry::new([(
            FAST_ID,
            Box::new(FastCompressor::new()) as Box<dyn Compressor>,
        )])
        .unwrap();
        MessageCodec::new(&CodecConfig::default(), registry).unwrap()
    }

    #[test]
    fn segment_roundtrip() {
        let codec = codec();
        for text in ["hello", "", "ünïcödé ✓ 中文", "long ".repeat(500).as_str()] {
            let encoded = codec.encode_segment(text).unwrap();
            assert_eq!(codec.decode_segment(&encoded).unwrap(), text);
        }
    }

    #[test]
    fn encoded_segment_uses_only_alphabet_symbols() {
        let codec = codec();
        let encoded = codec.encode_segment("the quick brown fox").unwrap();
        assert!(!encoded.is_empty());
        assert!(encoded.chars().all(|c| codec.alphabet().contains(c)));
    }

    #[test]
    fn new_encodes_use_highest_identifier() {
        let codec = codec();
        let encoded = codec.encode_segment("newest wins").unwrap();
        let info = codec.inspect_segment(&encoded).unwrap();
        assert_eq!(info.identifier, DENSE_ID);
        assert_eq!(info.compressor, Some("zstd"));
    }

    #[test]
    fn older_identifier_still_decodes() {
        let encoded = fast_only().encode_segment("written by an older peer").unwrap();
        let codec = codec();
        assert_eq!(codec.inspect_segment(&encoded).unwrap().identifier, FAST_ID);
        assert_eq!(
            codec.decode_segment(&encoded).unwrap(),
            "written by an older peer"
        );
    }

    #[test]
    fn unknown_identifier_is_reported() {
        // Encoded by a peer whose newest compressor is id 2; decoded by one
        // that only knows id 1.
        let encoded = codec().encode_segment("from the future").unwrap();
        let result = fast_only().decode_segment(&encoded);
        assert!(matches!(
            result,
            Err(DecodeError::UnknownCompressor { id: 2 })
        ));
    }

    #[test]
    fn foreign_symbol_is_invalid_character() {
        let codec = codec();
        let mut encoded = codec.encode_segment("abc").unwrap();
        encoded.push(' ');
        let position = encoded.chars().count() - 1;
        assert!(matches!(
            codec.decode_segment(&encoded),
            Err(DecodeError::InvalidCharacter { symbol: ' ', position: p }) if p == position
        ));
    }

    #[test]
    fn empty_segment_is_malformed() {
        assert!(matches!(
            codec().decode_segment(""),
            Err(DecodeError::MalformedEnvelope)
        ));
    }

    #[test]
    fn zero_valued_segment_is_too_small() {
        // Digit 0 in every position: the integer is zero.
        assert!(matches!(
            codec().decode_segment("!!!"),
            Err(DecodeError::EnvelopeTooSmall)
        ));
    }

    #[test]
    fn corrupt_body_is_a_decompression_error() {
        let codec = codec();
        // [2, 0xDE, 0xAD]: the dense identifier followed by garbage.
        let encoded = radix::encode(&[DENSE_ID, 0xDE, 0xAD], codec.alphabet());
        assert!(matches!(
            codec.decode_segment(&encoded),
            Err(DecodeError::Decompression(
                CompressionError::NativeDecompressionFailed(_)
            ))
        ));
    }

    #[test]
    fn oversized_output_is_rejected() {
        let generous = MessageCodec::from_config(
            &CodecConfig::default().with_max_decompressed_size(1 << 20),
        )
        .unwrap();
        let encoded = generous.encode_segment(&"a".repeat(100_000)).unwrap();

        assert!(matches!(
            codec().decode_segment(&encoded),
            Err(DecodeError::Decompression(
                CompressionError::OutputTooLarge { .. }
            ))
        ));
    }

    #[test]
    fn message_roundtrip_keeps_surrounding_text() {
        let codec = codec();
        let message = "before $!first secret!$ middle $!second!$ after";
        let encoded = codec.encode_message(message).unwrap();
        assert!(encoded.starts_with("before $!"));
        assert!(encoded.ends_with("!$ after"));
        assert!(!encoded.contains("first secret"));
        assert_eq!(codec.decode_message(&encoded), message.replace("$!", "").replace("!$", ""));
    }

    #[test]
    fn decode_message_contains_failures() {
        let codec = codec();
        let good = codec.encode_wrapped("fine").unwrap();
        let message = format!("a {good} b $! !$ c");
        insta::assert_snapshot!(
            codec.decode_message(&message),
            @"a fine b !unexpected character ' ' at position 0! c"
        );
    }

    #[test]
    fn inspect_reports_sizes() {
        let codec = codec();
        let encoded = codec.encode_segment("inspect me").unwrap();
        let info = codec.inspect_segment(&encoded).unwrap();
        assert_eq!(info.symbols, encoded.chars().count());
        assert!(info.body_len > 0);
    }

    #[test]
    fn inspect_tolerates_unknown_identifier() {
        let codec = codec();
        let encoded = radix::encode(&[9, 1, 2, 3], codec.alphabet());
        let info = codec.inspect_segment(&encoded).unwrap();
        assert_eq!(info.identifier, 9);
        assert_eq!(info.compressor, None);
        assert_eq!(info.body_len, 3);
    }

    #[test]
    fn custom_markers() {
        let config = CodecConfig {
            start_marker: "<<".to_owned(),
            end_marker: ">>".to_owned(),
            error_marker: '#',
            ..CodecConfig::default()
        };
        let codec = MessageCodec::from_config(&config).unwrap();
        let encoded = codec.encode_message("x <<hi>> y").unwrap();
        assert_eq!(codec.decode_message(&encoded), "x hi y");
        assert_eq!(codec.decode_message("<<\u{E000}>>").chars().next(), Some('#'));
    }

    #[test]
    fn tiny_alphabet_is_a_config_error() {
        let config = CodecConfig {
            alphabet_from: 'a',
            alphabet_to: 'a',
            ..CodecConfig::default()
        };
        assert!(matches!(
            MessageCodec::from_config(&config),
            Err(ConfigError::Alphabet(_))
        ));
    }

    #[test]
    fn codec_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MessageCodec>();

        let codec = Arc::new(codec());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let codec = Arc::clone(&codec);
                std::thread::spawn(move || {
                    let text = format!("message number {i}");
                    let encoded = codec.encode_segment(&text).unwrap();
                    assert_eq!(codec.decode_segment(&encoded).unwrap(), text);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
