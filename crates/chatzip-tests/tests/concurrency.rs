//! One codec shared by many threads: no locks, no cross-talk.

use std::sync::Arc;
use std::thread;

use chatzip_tests::{SAMPLES, standard_codec};

#[test]
fn shared_codec_across_threads() {
    let codec = Arc::new(standard_codec());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let codec = Arc::clone(&codec);
            thread::spawn(move || {
                for round in 0..10 {
                    for (name, text) in SAMPLES {
                        let text = format!("[{worker}/{round}] {text}");
                        let encoded = codec.encode_segment(&text).unwrap();
                        assert_eq!(
                            codec.decode_segment(&encoded).unwrap(),
                            text,
                            "sample {name}"
                        );
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn scoped_threads_see_identical_encodings() {
    let codec = standard_codec();
    let expected = codec.encode_segment("same input everywhere").unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(
                    codec.encode_segment("same input everywhere").unwrap(),
                    expected
                );
            });
        }
    });
}

#[test]
fn failures_in_one_thread_do_not_affect_others() {
    let codec = standard_codec();

    thread::scope(|scope| {
        let bad = scope.spawn(|| {
            for _ in 0..50 {
                assert!(codec.decode_segment("AB CD").is_err());
                assert!(codec.decode_segment("").is_err());
            }
        });
        let good = scope.spawn(|| {
            for i in 0..50 {
                let text = format!("message {i}");
                let encoded = codec.encode_segment(&text).unwrap();
                assert_eq!(codec.decode_segment(&encoded).unwrap(), text);
            }
        });
        bad.join().unwrap();
        good.join().unwrap();
    });
}
