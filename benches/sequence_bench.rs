use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use cursor_collections::{DynamicArray, GrowthPolicy, LinkedList};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_push_back_100k(c: &mut Criterion) {
    c.bench_function("array::push_back_100k_default_policy", |b| {
        b.iter_batched(
            DynamicArray::<u64>::new,
            |mut a| {
                for x in lcg(1).take(100_000) {
                    a.push_back(x);
                }
                black_box(a)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("array::push_back_100k_doubling", |b| {
        let policy = GrowthPolicy::new(2, 1, 100).unwrap();
        b.iter_batched(
            || DynamicArray::<u64>::with_policy(policy),
            |mut a| {
                for x in lcg(1).take(100_000) {
                    a.push_back(x);
                }
                black_box(a)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("list::push_back_100k", |b| {
        b.iter_batched(
            LinkedList::<u64>::new,
            |mut l| {
                for x in lcg(1).take(100_000) {
                    l.push_back(x);
                }
                black_box(l)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_erase(c: &mut Criterion) {
    c.bench_function("array::insert_erase_random_1k_on_10k", |b| {
        let base: DynamicArray<u64> = lcg(3).take(10_000).collect();
        let idx: Vec<usize> = lcg(4).take(1_000).map(|s| (s as usize) % 10_000).collect();
        b.iter_batched(
            || base.clone(),
            |mut a| {
                for &i in &idx {
                    let p = a.insert(a.begin() + i, 0).unwrap();
                    let _ = a.erase(p).unwrap();
                }
                black_box(a)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("list::insert_erase_at_held_positions_10k", |b| {
        b.iter_batched(
            || {
                let l: LinkedList<u64> = lcg(5).take(10_000).collect();
                let mut held = Vec::with_capacity(1_000);
                let mut pos = l.begin();
                for i in 0..10_000 {
                    if i % 10 == 0 {
                        held.push(pos);
                    }
                    pos = cursor_collections::Cursor::successor(pos, &l);
                }
                (l, held)
            },
            |(mut l, held)| {
                for p in held {
                    let q = l.insert(p, 0).unwrap();
                    let _ = l.erase(q).unwrap();
                }
                black_box(l)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate(c: &mut Criterion) {
    let a: DynamicArray<u64> = lcg(7).take(100_000).collect();
    let l: LinkedList<u64> = lcg(7).take(100_000).collect();
    c.bench_function("array::iter_sum_100k", |b| {
        b.iter(|| black_box(a.iter().fold(0u64, |s, v| s.wrapping_add(*v))))
    });
    c.bench_function("array::iter_rev_sum_100k", |b| {
        b.iter(|| black_box(a.iter().rev().fold(0u64, |s, v| s.wrapping_add(*v))))
    });
    c.bench_function("list::iter_sum_100k", |b| {
        b.iter(|| black_box(l.iter().fold(0u64, |s, v| s.wrapping_add(*v))))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_grow;
    config = bench_config();
    targets = bench_push_back_100k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_insert_erase, bench_iterate
}
criterion_main!(benches_grow, benches_ops);
