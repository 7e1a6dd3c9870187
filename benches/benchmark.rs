// Prediction benchmarks: single valuation, sensitivity grid and concurrent reads
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use propai_core::{
    DecisionTree, FeatureColumns, FeatureVector, ForestRegressor, LocationEncoder, Model,
    PropertyQuery, QueryBounds,
};
use propai_storage::ModelArtifacts;
use rand::prelude::*;
use std::sync::Arc;

const DEPTH: usize = 8;

/// Complete binary tree of the given depth with random splits
fn generate_random_tree(rng: &mut impl Rng, depth: usize) -> DecisionTree {
    let internal = (1usize << depth) - 1;
    let total = (1usize << (depth + 1)) - 1;

    let mut tree = DecisionTree {
        children_left: Vec::with_capacity(total),
        children_right: Vec::with_capacity(total),
        feature: Vec::with_capacity(total),
        threshold: Vec::with_capacity(total),
        value: Vec::with_capacity(total),
    };
    for node in 0..total {
        if node < internal {
            let feature = rng.random_range(0..4);
            let threshold = match feature {
                0 => rng.random_range(0.0..20.0),
                1 => rng.random_range(300.0..5000.0),
                _ => rng.random_range(1.0..6.0),
            };
            tree.children_left.push((2 * node + 1) as i64);
            tree.children_right.push((2 * node + 2) as i64);
            tree.feature.push(feature);
            tree.threshold.push(threshold);
        } else {
            tree.children_left.push(-1);
            tree.children_right.push(-1);
            tree.feature.push(-2);
            tree.threshold.push(-2.0);
        }
        tree.value.push(rng.random_range(20.0..300.0));
    }
    tree
}

fn generate_artifacts(n_trees: usize) -> ModelArtifacts {
    let mut rng = rand::rng();
    let trees = (0..n_trees)
        .map(|_| generate_random_tree(&mut rng, DEPTH))
        .collect();
    let classes = (0..20)
        .map(|i| format!("Location {}", i))
        .chain(std::iter::once("other".to_string()))
        .collect();

    ModelArtifacts::new(
        Model::Forest(ForestRegressor {
            n_features: 4,
            feature_importances: vec![0.1, 0.6, 0.15, 0.15],
            trees,
        }),
        LocationEncoder::new(classes).unwrap(),
        FeatureColumns::default(),
    )
    .unwrap()
}

fn generate_random_query(rng: &mut impl Rng) -> PropertyQuery {
    PropertyQuery::new(
        format!("Location {}", rng.random_range(0..25)),
        rng.random_range(300.0..5000.0),
        rng.random_range(1..=10),
        rng.random_range(1..=10),
    )
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    for n_trees in [10, 100, 500].iter() {
        let artifacts = generate_artifacts(*n_trees);
        let predictor = artifacts.predictor(QueryBounds::default());
        let query = PropertyQuery::new("Location 3", 1200.0, 3, 2);

        group.bench_with_input(BenchmarkId::new("forest", n_trees), n_trees, |b, _| {
            b.iter(|| {
                let result = predictor.predict(black_box(&query)).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

fn benchmark_sensitivity_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensitivity_grid");

    let artifacts = generate_artifacts(100);
    let predictor = artifacts.predictor(QueryBounds::default());
    let base = FeatureVector::new(3, 1200.0, 2, 3);

    group.bench_function("forest_100", |b| {
        b.iter(|| {
            let grid = predictor.sensitivity_grid(black_box(&base), 3, 2).unwrap();
            black_box(grid);
        });
    });

    group.finish();
}

fn benchmark_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");

    let artifacts = Arc::new(generate_artifacts(100));
    let mut rng = rand::rng();
    let queries: Vec<PropertyQuery> = (0..10).map(|_| generate_random_query(&mut rng)).collect();

    group.bench_function("forest_100", |b| {
        b.iter(|| {
            use std::thread;
            let handles: Vec<_> = queries
                .iter()
                .cloned()
                .map(|q| {
                    let artifacts = artifacts.clone();
                    thread::spawn(move || {
                        artifacts.predictor(QueryBounds::default()).predict(&q).is_ok()
                    })
                })
                .collect();

            for handle in handles {
                black_box(handle.join().unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_predict, benchmark_sensitivity_grid, benchmark_concurrent_reads);
criterion_main!(benches);
