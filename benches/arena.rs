use criterion::{criterion_group, criterion_main, Criterion};
use ordered_tree::arena::{Entry, TypedArena};
use ordered_tree::DEFAULT_CHUNK_SIZE;

const NUM_OF_ALLOCATIONS: usize = 100;

fn bench_arena(c: &mut Criterion) {
    c.bench_function("bench arena", |b| {
        b.iter(|| {
            struct Link {
                pub next: Option<Entry>,
            }

            let mut arena = TypedArena::new(DEFAULT_CHUNK_SIZE);
            let mut curr = arena.allocate(Link { next: None }).unwrap();
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = arena.allocate(Link { next: Some(curr) }).unwrap();
            }
        })
    });
}

fn bench_arena_reuse(c: &mut Criterion) {
    c.bench_function("bench arena reuse", |b| {
        let mut arena = TypedArena::new(DEFAULT_CHUNK_SIZE);
        b.iter(|| {
            let entries: Vec<Entry> = (0..NUM_OF_ALLOCATIONS)
                .map(|i| arena.allocate(i).unwrap())
                .collect();
            for entry in &entries {
                arena.free(entry);
            }
        })
    });
}

fn bench_box(c: &mut Criterion) {
    c.bench_function("bench box", |b| {
        b.iter(|| {
            struct Link {
                pub next: Option<Box<Link>>,
            }

            let mut curr = Box::new(Link { next: None });
            for _ in 0..NUM_OF_ALLOCATIONS {
                curr = Box::new(Link { next: Some(curr) });
            }
        })
    });
}

criterion_group!(benches, bench_arena, bench_arena_reuse, bench_box);
criterion_main!(benches);
