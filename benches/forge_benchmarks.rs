//! Tag fold and codec benchmarks

use std::hint::black_box;

use bullet_bridge::{Bullet, BulletFactory, RecordCodec};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_native_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("native_fold");
    let mut factory = BulletFactory::builtin();

    for len in [1usize, 4, 16] {
        let tags: Vec<&str> = ["C", "c plus plus"].iter().copied().cycle().take(len).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &tags, |b, tags| {
            b.iter(|| black_box(factory.create(black_box(tags), tags.len())))
        });
    }

    group.finish();
}

fn bench_script_fold(c: &mut Criterion) {
    let mut factory = BulletFactory::builtin();
    // first call pays for runtime startup
    let _ = factory.create(&["go"], 1);

    c.bench_function("script_fold/go", |b| {
        b.iter(|| black_box(factory.create(black_box(&["C", "go"]), 2)))
    });
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let bullet = Bullet::default();
    let bytes = RecordCodec::encode(&bullet);

    group.bench_function("encode", |b| b.iter(|| black_box(RecordCodec::encode(black_box(&bullet)))));
    group.bench_function("decode", |b| b.iter(|| black_box(RecordCodec::decode(black_box(&bytes)))));

    group.finish();
}

criterion_group!(benches, bench_native_fold, bench_script_fold, bench_codec);
criterion_main!(benches);
