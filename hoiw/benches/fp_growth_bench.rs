use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hoiw::{mine, ExecutionMode, MiningConfig, TransactionDatabase, WeightTable};
use rand::Rng;

/// Generate a synthetic weighted database
///
/// Parameters:
/// - num_transactions: Number of transactions
/// - num_items: Size of the item vocabulary
/// - avg_transaction_size: Average items per transaction
/// - density: Probability that a drawn item is kept
fn generate_database(
    num_transactions: usize,
    num_items: usize,
    avg_transaction_size: usize,
    density: f64,
) -> TransactionDatabase {
    let mut rng = rand::thread_rng();

    let weights = WeightTable::from_pairs(
        (0..num_items).map(|item| (format!("i{item}"), rng.gen_range(0.05..1.0))),
    )
    .expect("generated weights are finite");

    let mut transactions = Vec::with_capacity(num_transactions);
    for _ in 0..num_transactions {
        let random_factor: f64 = rng.r#gen();
        let size = (avg_transaction_size as f64 * (0.5 + random_factor)).round() as usize;

        let mut transaction = Vec::new();
        for _ in 0..size.min(num_items) {
            let density_check: f64 = rng.r#gen();
            if density_check < density {
                transaction.push(format!("i{}", rng.gen_range(0..num_items)));
            }
        }
        transactions.push(transaction);
    }

    TransactionDatabase::from_transactions(&weights, transactions)
}

/// Scaling with the number of transactions
fn bench_hoiw_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("hoiw_scaling");

    let configs = vec![
        ("small_100tx", 100, 20, 5),
        ("medium_500tx", 500, 50, 10),
        ("large_1000tx", 1000, 100, 15),
        ("xlarge_5000tx", 5000, 100, 20),
    ];

    for (name, num_tx, num_items, avg_size) in configs {
        let db = generate_database(num_tx, num_items, avg_size, 0.7);
        let config = MiningConfig::new(0.001);

        group.bench_with_input(BenchmarkId::from_parameter(name), &db, |b, db| {
            b.iter(|| mine(black_box(db), black_box(&config)));
        });
    }

    group.finish();
}

/// Lower thresholds prune less
fn bench_hoiw_min_occupancy(c: &mut Criterion) {
    let mut group = c.benchmark_group("hoiw_min_occupancy");

    let db = generate_database(1000, 50, 10, 0.7);

    for &min_occupancy in &[0.0005, 0.001, 0.005, 0.01, 0.05] {
        let config = MiningConfig::new(min_occupancy);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.4}", min_occupancy)),
            &config,
            |b, config| {
                b.iter(|| mine(black_box(&db), black_box(config)));
            },
        );
    }

    group.finish();
}

fn bench_hoiw_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("hoiw_execution");

    let db = generate_database(2000, 60, 12, 0.7);

    for (name, execution) in [
        ("sequential", ExecutionMode::Sequential),
        ("parallel", ExecutionMode::Parallel),
    ] {
        let config = MiningConfig::new(0.001).with_execution(execution);
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| mine(black_box(&db), black_box(config)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hoiw_scaling,
    bench_hoiw_min_occupancy,
    bench_hoiw_execution
);
criterion_main!(benches);
