use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ordered_tree::{TreeMap, TreeMultiSet};
use rand::Rng;
use std::collections::BTreeMap;

const NUM_OF_OPERATIONS: usize = 100;

fn bench_btreemap_insert(c: &mut Criterion) {
    c.bench_function("bench btreemap insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut map = BTreeMap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                let key = rng.next_u32();
                let val = rng.next_u32();

                map.insert(key, val);
            }
        })
    });
}

fn bench_btreemap_get(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = BTreeMap::new();
    let mut values = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        let val = rng.next_u32();

        map.insert(key, val);
        values.push(key);
    }

    c.bench_function("bench btreemap get", move |b| {
        b.iter(|| {
            for key in &values {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_tree_map_insert(c: &mut Criterion) {
    c.bench_function("bench tree map insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut map = TreeMap::new();
            for _ in 0..NUM_OF_OPERATIONS {
                let key = rng.next_u32();
                let val = rng.next_u32();

                map.insert(key, val).unwrap();
            }
        })
    });
}

fn bench_tree_map_get(c: &mut Criterion) {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = TreeMap::new();
    let mut values = Vec::new();
    for _ in 0..NUM_OF_OPERATIONS {
        let key = rng.next_u32();
        let val = rng.next_u32();

        map.insert(key, val).unwrap();
        values.push(key);
    }

    c.bench_function("bench tree map get", move |b| {
        b.iter(|| {
            for key in &values {
                black_box(map.get(key));
            }
        })
    });
}

fn bench_tree_map_remove(c: &mut Criterion) {
    c.bench_function("bench tree map insert remove", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut map = TreeMap::new();
            let mut keys = Vec::new();
            for _ in 0..NUM_OF_OPERATIONS {
                let key = rng.next_u32();
                map.insert(key, key).unwrap();
                keys.push(key);
            }
            for key in &keys {
                black_box(map.remove(key));
            }
        })
    });
}

fn bench_tree_multiset_insert(c: &mut Criterion) {
    c.bench_function("bench tree multiset insert", |b| {
        b.iter(|| {
            let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
            let mut set = TreeMultiSet::new();
            for _ in 0..NUM_OF_OPERATIONS {
                set.insert(rng.next_u32() % 16).unwrap();
            }
        })
    });
}

criterion_group!(
    benches,
    bench_btreemap_get,
    bench_btreemap_insert,
    bench_tree_map_get,
    bench_tree_map_insert,
    bench_tree_map_remove,
    bench_tree_multiset_insert,
);
criterion_main!(benches);
