use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use cursor_collections::{ChainedMap, TableConfig};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn growing() -> ChainedMap<String, u64> {
    ChainedMap::with_config(TableConfig::new(16, Some(1.0)).unwrap())
}

fn fixed() -> ChainedMap<String, u64> {
    ChainedMap::new()
}

fn bench_insert_100k(c: &mut Criterion) {
    c.bench_function("table::insert_100k_growing", |b| {
        b.iter_batched(
            growing,
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    t.insert((key(x), i as u64));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });

    // Fixed buckets: chains grow linearly, so keep this one small.
    c.bench_function("table::insert_10k_fixed_10_buckets", |b| {
        b.iter_batched(
            fixed,
            |mut t| {
                for (i, x) in lcg(2).take(10_000).enumerate() {
                    t.insert((key(x), i as u64));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find(c: &mut Criterion) {
    c.bench_function("table::find_hit_10k_on_100k", |b| {
        let mut t = growing();
        let keys: Vec<_> = lcg(7).take(100_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            t.insert((k.clone(), i as u64));
        }
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(t.find(k.as_str()));
            }
        })
    });

    c.bench_function("table::find_miss_10k_on_100k", |b| {
        let mut t = growing();
        for (i, x) in lcg(11).take(100_000).enumerate() {
            t.insert((key(x), i as u64));
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(t.find(k.as_str()));
            }
        })
    });
}

fn bench_erase(c: &mut Criterion) {
    c.bench_function("table::erase_random_10k_of_100k", |b| {
        b.iter_batched(
            || {
                let mut t = growing();
                let keys: Vec<_> = lcg(5).take(100_000).map(key).collect();
                for (i, k) in keys.iter().enumerate() {
                    t.insert((k.clone(), i as u64));
                }
                let victims: Vec<String> = lcg(6)
                    .take(10_000)
                    .map(|s| keys[(s as usize) % keys.len()].clone())
                    .collect();
                (t, victims)
            },
            |(mut t, victims)| {
                for k in &victims {
                    black_box(t.erase(k.as_str()));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_find, bench_erase
}
criterion_main!(benches_insert, benches_ops);
