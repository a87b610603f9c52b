use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use haystackd::matcher::{Algorithm, SortedIndex};
use rand::distributions::Alphanumeric;
use rand::Rng;

// Helper function to build a dataset of random fixed-length lines
fn build_dataset(num_lines: usize, line_len: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..num_lines)
        .map(|_| {
            std::iter::repeat_with(|| rng.sample(Alphanumeric))
                .take(line_len)
                .map(char::from)
                .collect()
        })
        .collect()
}

fn bench_strategies_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies_varying_sizes");
    group.sample_size(10); // Reduce sample size for large datasets

    for size in [10_000, 100_000, 500_000].iter() {
        let dataset = build_dataset(*size, 20);
        // a present line: every strategy pays for the hit confirmation
        let query = dataset[size / 2].clone();

        for algorithm in Algorithm::ALL {
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), size),
                size,
                |b, _| {
                    b.iter(|| {
                        black_box(algorithm.find_matches(&dataset, &query));
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_miss_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies_miss_path");
    group.sample_size(10);

    let dataset = build_dataset(100_000, 20);
    // random queries virtually never collide with the dataset, so this is
    // the full-scan worst case
    let query = "zzzzzzzzzzzzzzzzzzz!".to_string();

    for algorithm in Algorithm::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(algorithm.name()),
            &algorithm,
            |b, algorithm| {
                b.iter(|| {
                    black_box(algorithm.find_matches(&dataset, &query));
                });
            },
        );
    }
    group.finish();
}

fn bench_sorted_index_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_index");

    let dataset = build_dataset(100_000, 20);
    let query = dataset[50_000].clone();

    group.bench_function("build_per_call", |b| {
        b.iter(|| {
            black_box(Algorithm::SortedBinary.find_matches(&dataset, &query));
        });
    });

    let index = SortedIndex::build(&dataset);
    group.bench_function("probe_prebuilt", |b| {
        b.iter(|| {
            black_box(index.contains(&query));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_strategies_varying_sizes,
    bench_miss_path,
    bench_sorted_index_reuse
);
criterion_main!(benches);
