#![no_main]

use chatzip_compress::{Compressor, DenseCompressor, FastCompressor};
use libfuzzer_sys::fuzz_target;

// Fuzz target: raw compressor bodies, bypassing the alphabet.
//
// A small limit keeps bombs cheap; both decoders must fail cleanly or
// return at most `LIMIT` bytes.
const LIMIT: usize = 4096;

fuzz_target!(|data: &[u8]| {
    let fast = FastCompressor::with_limit(LIMIT);
    let dense = DenseCompressor::with_limit(LIMIT);
    for compressor in [&fast as &dyn Compressor, &dense] {
        if let Ok(text) = compressor.decompress(data) {
            assert!(text.len() <= LIMIT);
        }
    }
});
