//! Shared fixtures for the chatzip integration tests and benches.

use std::sync::LazyLock;

use chatzip_codec::MessageCodec;

/// Chat-sized sample texts, from a one-liner up to a pasted log excerpt.
pub const SAMPLES: [(&str, &str); 4] = [
    ("greeting", "hey, are you around later?"),
    (
        "sentence",
        "The build failed again on the integration runner, same timeout as yesterday.",
    ),
    (
        "unicode",
        "Grüße aus Köln! 你好，世界。 Привет, мир. ✓ done → next ☕",
    ),
    (
        "log",
        "ERROR [net] connection reset by peer (attempt 1)\n\
         ERROR [net] connection reset by peer (attempt 2)\n\
         ERROR [net] connection reset by peer (attempt 3)\n\
         WARN  [net] giving up after 3 attempts, backing off for 30s",
    ),
];

/// Codec with the default configuration and standard registry.
///
/// # Panics
///
/// Panics if the default configuration is rejected, which would be a bug.
pub fn standard_codec() -> MessageCodec {
    MessageCodec::standard().expect("default codec configuration must be valid")
}

/// Process-wide standard codec, for tests that build one per case.
pub fn shared_codec() -> &'static MessageCodec {
    static CODEC: LazyLock<MessageCodec> = LazyLock::new(standard_codec);
    &CODEC
}
