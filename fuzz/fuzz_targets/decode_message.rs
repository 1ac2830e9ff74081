#![no_main]

use std::sync::LazyLock;

use chatzip_codec::MessageCodec;
use libfuzzer_sys::fuzz_target;

static CODEC: LazyLock<MessageCodec> =
    LazyLock::new(|| MessageCodec::standard().expect("default configuration is valid"));

// Fuzz target: whole-message decode.
//
// `decode_message` must never panic: every bad segment is rendered inline.
// Exercises the scanner, symbol lookup, envelope parsing, registry
// dispatch, and both decompressors on hostile bodies.
fuzz_target!(|text: &str| {
    let _ = CODEC.decode_message(text);
});
