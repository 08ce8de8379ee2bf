use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use virtual_n5::generator::generate;
use virtual_n5::{resolve, ChunkRequest, CompressionConfig, DatasetConfig, VirtualVolume};

fn bench_generate(c: &mut Criterion) {
    let volume = VirtualVolume::new(&DatasetConfig::default()).unwrap();
    let geometry = *volume.geometry();
    let chunk_box = resolve(&geometry, &ChunkRequest::new(0, [10, 10, 10], 0)).unwrap();

    c.bench_function("generate interior chunk", |b| {
        b.iter(|| generate(black_box(&chunk_box), &geometry))
    });
}

fn bench_read_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_chunk");
    let request = ChunkRequest::new(0, [10, 10, 10], 0);

    for (name, compression) in [
        ("raw", CompressionConfig::Raw),
        ("gzip", CompressionConfig::default()),
        ("zstd", CompressionConfig::Zstd { level: 3 }),
    ] {
        let config = DatasetConfig {
            compression,
            ..Default::default()
        };
        let volume = VirtualVolume::new(&config).unwrap();
        group.bench_function(name, |b| b.iter(|| volume.read_chunk(black_box(&request))));
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_read_chunk);
criterion_main!(benches);
