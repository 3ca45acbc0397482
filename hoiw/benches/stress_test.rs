use hoiw::{
    mine, ExecutionMode, MiningConfig, PrefilterPolicy, TransactionDatabase, WeightTable,
};
use rand::Rng;
use std::time::Instant;

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

fn print_memory_stats() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            if let Some(line) = status.lines().find(|line| line.starts_with("VmRSS:")) {
                println!("  Memory: {}", line.trim_start_matches("VmRSS:").trim());
            }
        }
    }
}

fn run(db: &TransactionDatabase, config: &MiningConfig) {
    let start = Instant::now();
    match mine(db, config) {
        Ok(outcome) => {
            println!("  Time: {:?}", start.elapsed());
            println!("  Itemsets: {}", outcome.len());
            println!(
                "  Tree: {} nodes, ~{} KB",
                outcome.stats.tree_nodes,
                outcome.stats.tree_bytes / 1024
            );
            println!(
                "  Candidates: {} evaluated, {} pruned, depth {}",
                outcome.stats.candidates_evaluated,
                outcome.stats.pruned_by_bound,
                outcome.stats.max_depth
            );
            if outcome.stats.truncated {
                println!("  ⚠ Time limit reached");
            }
            print_memory_stats();
        }
        Err(err) => println!("  ✗ Failed: {err}"),
    }
}

fn stress_test_large_databases() {
    println!("\n=== Large Database Test ===");

    let configs = vec![
        ("10K x 50", 10_000, 50, 15),
        ("50K x 80", 50_000, 80, 20),
        ("100K x 100", 100_000, 100, 25),
    ];

    for (name, num_tx, num_items, avg_size) in configs {
        println!("\nTesting: {}", name);
        let start_gen = Instant::now();
        let db = generate_database(num_tx, num_items, avg_size, 0.7);
        println!("  Generated in {:?}", start_gen.elapsed());

        let config = MiningConfig::new(0.002)
            .with_execution(ExecutionMode::Parallel);
        run(&db, &config);
    }
}

fn stress_test_prefilter_policies() {
    println!("\n=== Pre-filter Policy Comparison ===");

    let db = generate_database(20_000, 100, 20, 0.6);
    for (name, policy) in [
        ("transaction-max-weight", PrefilterPolicy::TransactionMaxWeight),
        ("weighted-support", PrefilterPolicy::WeightedSupport),
    ] {
        println!("\nPolicy: {}", name);
        let config = MiningConfig::new(0.002)
            .with_min_weighted_support(0.005)
            .with_prefilter(policy);
        run(&db, &config);
    }
}

fn stress_test_low_threshold() {
    println!("\n=== Low Threshold Test ===");

    let db = generate_database(20_000, 100, 20, 0.6);
    for &min_occupancy in &[0.01, 0.005, 0.002, 0.001] {
        println!("\nTesting min_occupancy = {}", min_occupancy);
        let mut config = MiningConfig::new(min_occupancy)
            .with_min_weighted_support(0.0)
            .with_execution(ExecutionMode::Parallel);
        config.time_limit_secs = Some(60.0);
        run(&db, &config);
    }
}

fn main() {
    println!("=== HOIW Stress Testing Suite ===");

    stress_test_large_databases();
    stress_test_prefilter_policies();
    stress_test_low_threshold();

    println!("\n=== Stress Testing Complete ===");
}
