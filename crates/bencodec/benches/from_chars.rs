//! Digit-run parsing throughput, word-parallel against serial.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bencodec::{decode_view_with, DecodeOptions, Strategy};

fn integer_documents(digits: u32) -> Vec<u8> {
    let value = 10u64.pow(digits - 1) + 7;
    let mut out = Vec::new();
    out.push(b'l');
    for _ in 0..1000 {
        out.extend_from_slice(format!("i{value}e").as_bytes());
    }
    out.push(b'e');
    out
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_integers");
    for digits in [4u32, 12, 19] {
        let input = integer_documents(digits);
        for strategy in [Strategy::Serial, Strategy::Swar] {
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), digits),
                &input,
                |b, input| {
                    let options = DecodeOptions { strategy, ..DecodeOptions::default() };
                    b.iter(|| decode_view_with(black_box(input), options).unwrap());
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
