// SPDX-License-Identifier: MIT
//! Benchmarks for approximation, passage and container conversions

use bisection_codec::{Approximation, BitSequence, CodecConfig, Passage};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigUint;
use std::hint::black_box;

fn create_target(bits: usize) -> BigUint {
    // Deterministic pseudo-random bytes (xorshift)
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let bytes: Vec<u8> = (0..bits.div_ceil(8))
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state & 0xFF) as u8
        })
        .collect();
    let value = BigUint::from_bytes_be(&bytes);
    value >> (bytes.len() * 8 - bits)
}

fn benchmark_encode(c: &mut Criterion) {
    let config = CodecConfig::default();
    let mut group = c.benchmark_group("approximation_encode");
    for bits in [32usize, 64, 128] {
        let target = create_target(bits);
        group.bench_with_input(BenchmarkId::from_parameter(bits), &target, |b, target| {
            b.iter(|| {
                Approximation::new(black_box(target.clone()), bits, config)
                    .encode()
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let config = CodecConfig::default();
    let target = create_target(128);
    let encoding = Approximation::new(target, 128, config).encode().unwrap();

    c.bench_function("approximation_decode_128", |b| {
        b.iter(|| Approximation::decode_integer(black_box(&encoding.signature), &config).unwrap())
    });
}

fn benchmark_passage(c: &mut Criterion) {
    let passage = Passage::new(CodecConfig::default());
    let target = create_target(1024);

    c.bench_function("passage_bisect_1024", |b| {
        b.iter(|| passage.bisect(black_box(&target), 1024, 0).unwrap())
    });

    let movement = passage.bisect(&target, 1024, 0).unwrap();
    c.bench_function("passage_perform_1024", |b| {
        b.iter(|| passage.perform_integer(black_box(&movement)).unwrap())
    });
}

fn benchmark_sequence(c: &mut Criterion) {
    let target = create_target(4096);

    c.bench_function("sequence_from_integer_4096", |b| {
        b.iter(|| BitSequence::from_integer(black_box(&target)).unwrap())
    });

    let seq = BitSequence::from_integer(&target).unwrap();
    c.bench_function("sequence_align_4096", |b| {
        b.iter(|| black_box(&seq).align(13).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_decode,
    benchmark_passage,
    benchmark_sequence
);
criterion_main!(benches);
