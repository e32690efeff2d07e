use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use aes_core::{encrypt_block, expand_key, Aes128Key};
use aes_lanes::{BatchDriver, DriverConfig, Execution, DEFAULT_LANE_COUNT};

fn random_pairs(rng: &mut ChaCha20Rng, count: usize) -> Vec<([u8; 16], [u8; 16])> {
    (0..count)
        .map(|_| {
            let mut key = [0u8; 16];
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut key);
            rng.fill_bytes(&mut block);
            (key, block)
        })
        .collect()
}

fn bench_single_lane(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
    let mut key = [0u8; 16];
    let mut block = [0u8; 16];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut block);
    let round_keys = expand_key(&Aes128Key::from(key));

    let mut group = c.benchmark_group("single_lane");
    group.bench_function("expand_key", |b| {
        b.iter(|| expand_key(&Aes128Key::from(key)));
    });
    group.bench_function("encrypt_block", |b| {
        b.iter(|| encrypt_block(&block, &round_keys));
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
    let pairs = random_pairs(&mut rng, DEFAULT_LANE_COUNT);

    let mut group = c.benchmark_group("batch");
    group.sample_size(50);
    for (name, execution) in [
        ("sequential", Execution::Sequential),
        ("parallel", Execution::Parallel { threads: None }),
    ] {
        let driver = BatchDriver::with_config(DriverConfig {
            execution,
            ..DriverConfig::default()
        })
        .expect("driver");
        group.bench_with_input(BenchmarkId::new(name, DEFAULT_LANE_COUNT), &pairs, |b, pairs| {
            b.iter(|| driver.encrypt_batch(pairs).expect("batch"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_lane, bench_batch);
criterion_main!(benches);
