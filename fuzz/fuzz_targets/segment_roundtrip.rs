#![no_main]

use std::sync::LazyLock;

use arbitrary::Arbitrary;
use chatzip_codec::MessageCodec;
use chatzip_compress::DECOMPRESSION_SIZE_LIMIT;
use chatzip_wire::radix;
use libfuzzer_sys::fuzz_target;

static CODEC: LazyLock<MessageCodec> =
    LazyLock::new(|| MessageCodec::standard().expect("default configuration is valid"));

#[derive(Debug, Arbitrary)]
enum FuzzInput {
    /// Arbitrary text through the full segment codec.
    Text(String),
    /// Arbitrary bytes through the radix layer only.
    Bytes(Vec<u8>),
}

// Fuzz target: encode→decode must reproduce the input.
fuzz_target!(|input: FuzzInput| {
    match input {
        FuzzInput::Text(text) => {
            if text.len() > DECOMPRESSION_SIZE_LIMIT {
                return;
            }
            let encoded = CODEC.encode_segment(&text).expect("encode never fails on text");
            assert!(encoded.chars().all(|c| CODEC.alphabet().contains(c)));
            let decoded = CODEC.decode_segment(&encoded).expect("own output decodes");
            assert_eq!(decoded, text);
        }
        FuzzInput::Bytes(bytes) => {
            // Leading zero bytes carry no value and do not survive.
            let significant = match bytes.iter().position(|&b| b != 0) {
                Some(first) => &bytes[first..],
                None => &[][..],
            };
            let encoded = radix::encode(&bytes, CODEC.alphabet());
            let decoded = radix::decode(&encoded, CODEC.alphabet()).expect("own output decodes");
            if significant.is_empty() {
                assert!(decoded.is_empty());
            } else {
                assert_eq!(decoded, significant);
            }
        }
    }
});
