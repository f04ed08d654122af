//! Benchmarks for map operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use critbit_rs::CritbitMap;
use std::collections::BTreeMap;

fn generate_sequential_keys(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("key:{:08}", i).into_bytes()).collect()
}

fn generate_url_like_keys(n: usize) -> Vec<Vec<u8>> {
    let domains = ["example.com", "test.org", "demo.net", "sample.io"];
    let paths = ["users", "posts", "comments", "api/v1", "api/v2"];

    (0..n)
        .map(|i| {
            let domain = domains[i % domains.len()];
            let path = paths[(i / domains.len()) % paths.len()];
            let id = i / (domains.len() * paths.len());
            format!("{}/{}/{}", domain, path, id).into_bytes()
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_sequential_keys(size);

        group.bench_with_input(BenchmarkId::new("CritbitMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = CritbitMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key, &(i as u64).to_be_bytes()).unwrap();
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.clone(), (i as u64).to_be_bytes().to_vec());
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000, 100_000] {
        let keys = generate_url_like_keys(size);

        let mut map = CritbitMap::new();
        let mut btree: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            map.insert(key, &(i as u64).to_be_bytes()).unwrap();
            btree.insert(key.clone(), (i as u64).to_be_bytes().to_vec());
        }

        group.bench_with_input(BenchmarkId::new("CritbitMap", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(map.get(key));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                for key in keys {
                    black_box(btree.get(key.as_slice()));
                }
            });
        });
    }

    group.finish();
}

fn bench_prefix_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix_scan");

    let keys = generate_url_like_keys(100_000);
    let mut map = CritbitMap::new();
    for (i, key) in keys.iter().enumerate() {
        map.insert(key, &(i as u64).to_be_bytes()).unwrap();
    }

    group.bench_function("CritbitMap", |b| {
        b.iter(|| {
            let mut n = 0usize;
            for entry in map.iter_prefix(b"example.com/api") {
                black_box(entry);
                n += 1;
            }
            n
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_prefix_scan);
criterion_main!(benches);
