// In benches/stream_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lzham_bridge::{Bridge, CompressOptions, DecompressOptions, ZstdEngine};

/// Generates a vector of highly compressible data.
fn generate_low_entropy_bytes(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let pattern = b"abcdefgABCDEFG12345";
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

/// Generates less compressible data from a seeded generator.
fn generate_high_entropy_bytes(size: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut data = vec![0u8; size];
    rng.fill(&mut data[..]);
    data
}

const BENCH_DATA_SIZE: usize = 1 << 20; // 1 MB

fn compress_options() -> CompressOptions {
    CompressOptions {
        dict_size_log2: 22,
        level: 1,
        ..Default::default()
    }
}

fn decompress_options() -> DecompressOptions {
    DecompressOptions {
        dict_size_log2: 22,
        ..Default::default()
    }
}

fn bench_stream_drivers(c: &mut Criterion) {
    // --- Setup Data ---
    let inputs = [
        ("Low Entropy", generate_low_entropy_bytes(BENCH_DATA_SIZE)),
        ("High Entropy", generate_high_entropy_bytes(BENCH_DATA_SIZE)),
    ];

    let mut bridge = Bridge::new(ZstdEngine::new());
    let compressor = bridge.compress_init(&compress_options()).unwrap();
    let decompressor = bridge.decompress_init(&decompress_options()).unwrap();

    let mut group = c.benchmark_group("Streaming Drivers");
    group.throughput(Throughput::Bytes(BENCH_DATA_SIZE as u64));

    for (label, data) in &inputs {
        // Every block finishes its handle, so each iteration re-arms first.
        group.bench_function(format!("Compress ({})", label), |b| {
            b.iter(|| {
                bridge.compress_reinit(compressor).unwrap();
                black_box(bridge.compress(compressor, black_box(data)).unwrap())
            })
        });

        bridge.compress_reinit(compressor).unwrap();
        let compressed = bridge.compress(compressor, data).unwrap();

        group.bench_function(format!("Decompress ({})", label), |b| {
            b.iter(|| {
                bridge
                    .decompress_reinit(decompressor, &decompress_options())
                    .unwrap();
                black_box(
                    bridge
                        .decompress(decompressor, black_box(&compressed), data.len())
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stream_drivers);
criterion_main!(benches);
