use criterion::{black_box, criterion_group, criterion_main, Criterion};
use interval_trees::{AvlDiet, Diet, IntervalTree};
use rand::{thread_rng, Rng};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("interval_tree insert low=1..200,len=0..200", |b| {
        let mut tree = IntervalTree::new();
        let mut rng = thread_rng();

        b.iter(|| {
            let low = rng.gen_range(1..200);
            let high = low + rng.gen_range(0..200);
            tree.insert((low, high)).expect("insert should work");
        })
    });

    c.bench_function("interval_tree find_all_overlapping n=1000", |b| {
        let mut tree = IntervalTree::new();
        let mut rng = thread_rng();
        for _ in 0..1000 {
            let low = rng.gen_range(1..200);
            let high = low + rng.gen_range(0..200);
            tree.insert((low, high)).expect("insert should work");
        }

        b.iter(|| {
            let low = rng.gen_range(1..400);
            let high = low + rng.gen_range(0..32);
            black_box(tree.find_all_overlapping((low, high)))
        })
    });

    c.bench_function("diet insert domain=64k", |b| {
        let mut set = Diet::new();
        let mut rng = thread_rng();

        b.iter(|| {
            let low = rng.gen_range(0..65000);
            let high = low + rng.gen_range(0..64);
            set.insert((low, high), |a, b| {
                black_box((a, b));
            })
            .expect("insert should work");
        })
    });

    c.bench_function("avl_diet insert domain=64k", |b| {
        let mut set = AvlDiet::new();
        let mut rng = thread_rng();

        b.iter(|| {
            let low = rng.gen_range(0..65000);
            let high = low + rng.gen_range(0..64);
            set.insert((low, high), |a, b| {
                black_box((a, b));
            })
            .expect("insert should work");
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
