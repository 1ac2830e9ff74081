#![no_main]

use std::sync::LazyLock;

use chatzip_codec::MessageCodec;
use chatzip_compress::DECOMPRESSION_SIZE_LIMIT;
use libfuzzer_sys::fuzz_target;

static CODEC: LazyLock<MessageCodec> =
    LazyLock::new(|| MessageCodec::standard().expect("default configuration is valid"));

// Fuzz target: single segment decode.
//
// Any successful decode must respect the output limit.
fuzz_target!(|segment: &str| {
    if let Ok(text) = CODEC.decode_segment(segment) {
        assert!(text.len() <= DECOMPRESSION_SIZE_LIMIT);
    }
    let _ = CODEC.inspect_segment(segment);
});
