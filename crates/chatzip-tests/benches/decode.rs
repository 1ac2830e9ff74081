use chatzip_tests::{SAMPLES, standard_codec};
use chatzip_wire::{AlphabetTable, radix};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn bench_decode_samples(c: &mut Criterion) {
    let codec = standard_codec();
    let mut group = c.benchmark_group("decode_segment");

    for (name, text) in SAMPLES {
        let encoded = codec.encode_segment(text).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &encoded, |b, encoded| {
            b.iter(|| codec.decode_segment(encoded).unwrap());
        });
    }

    group.finish();
}

fn bench_decode_message_with_failures(c: &mut Criterion) {
    let codec = standard_codec();
    let good = codec.encode_wrapped("a perfectly fine segment").unwrap();
    let message = format!("{good} and $!this one is broken!$ and {good}");

    c.bench_function("decode_message_mixed", |b| {
        b.iter(|| codec.decode_message(&message));
    });
}

fn bench_radix(c: &mut Criterion) {
    let alphabet = AlphabetTable::standard().unwrap();
    let mut group = c.benchmark_group("radix_decode");

    for len in [16usize, 128, 1024] {
        let bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8 | 1).collect();
        let encoded = radix::encode(&bytes, &alphabet);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &encoded, |b, encoded| {
            b.iter(|| radix::decode(encoded, &alphabet).unwrap());
        });
    }

    group.finish();
}

fn bench_alphabet_build(c: &mut Criterion) {
    c.bench_function("alphabet_standard", |b| {
        b.iter(|| AlphabetTable::standard().unwrap());
    });
}

criterion_group!(
    benches,
    bench_decode_samples,
    bench_decode_message_with_failures,
    bench_radix,
    bench_alphabet_build
);
criterion_main!(benches);
