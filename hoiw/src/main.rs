//! `hoiw` command line: mine high-occupancy weighted itemsets or sweep thresholds.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hoiw::config::{ExecutionMode, MiningConfig, OccupancyDefinition, PrefilterPolicy};
use hoiw::data::{write_itemsets, write_sweep_csv, TransactionDatabase, WeightTable};
use hoiw::{mine, mine_exhaustive, run_sweep};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "hoiw")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "High-occupancy weighted itemset mining", long_about = None)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mine itemsets for one threshold
    Mine(MineArgs),
    /// Mine once per (min_occupancy, min_weighted_support) pair and report a CSV
    Sweep(SweepArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Transaction file, one `T<id>: item item ...` per line
    #[arg(short, long)]
    transactions: PathBuf,

    /// JSON object mapping item -> weight
    #[arg(short, long)]
    weights: PathBuf,

    /// TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    occupancy: Option<OccupancyDefinition>,

    #[arg(long)]
    prefilter: Option<PrefilterPolicy>,

    #[arg(long)]
    max_itemset_length: Option<usize>,

    /// Mine first-level branches in parallel
    #[arg(long)]
    parallel: bool,

    /// Worker threads for parallel mining
    #[arg(long)]
    threads: Option<usize>,

    /// Stop starting new top-level items after this many seconds
    #[arg(long)]
    time_limit: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Bound-pruned conditional FP-tree search
    FpGrowth,
    /// Enumerate every combination (small item counts only)
    Exhaustive,
}

#[derive(Args, Debug)]
struct MineArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Acceptance threshold (required unless set in the config file)
    #[arg(long)]
    min_occupancy: Option<f64>,

    /// Pre-filter floor
    #[arg(long)]
    min_weighted_support: Option<f64>,

    #[arg(long, value_enum, default_value = "fp-growth")]
    strategy: Strategy,

    /// Write `itemset: {..} occupancy: ..` lines here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of top itemsets to print
    #[arg(long, default_value = "5")]
    top: usize,
}

#[derive(Args, Debug)]
struct SweepArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long, value_delimiter = ',', required = true)]
    min_occupancy: Vec<f64>,

    #[arg(long, value_delimiter = ',', default_value = "0.01")]
    min_weighted_support: Vec<f64>,

    /// CSV report path
    #[arg(short, long, default_value = "sweep_results.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase())),
        )
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Command::Mine(args) => run_mine(args),
        Command::Sweep(args) => run_sweep_command(args),
    }
}

fn load(input: &InputArgs) -> Result<(TransactionDatabase, MiningConfig)> {
    let mut config = match &input.config {
        Some(path) => MiningConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MiningConfig::default(),
    };
    if let Some(definition) = input.occupancy {
        config.occupancy_definition = definition;
    }
    if let Some(prefilter) = input.prefilter {
        config.prefilter = prefilter;
    }
    if input.max_itemset_length.is_some() {
        config.max_itemset_length = input.max_itemset_length;
    }
    if input.parallel {
        config.execution = ExecutionMode::Parallel;
    }
    if input.threads.is_some() {
        config.threads = input.threads;
    }
    if input.time_limit.is_some() {
        config.time_limit_secs = input.time_limit;
    }

    info!("Loading weights from: {}", input.weights.display());
    let weights = WeightTable::from_json_file(&input.weights).context("Failed to load weights")?;

    info!("Loading transactions from: {}", input.transactions.display());
    let db = TransactionDatabase::from_file(&input.transactions, &weights)
        .context("Failed to load transactions")?;
    info!(
        "Loaded {} transactions over {} weighted items ({} lines skipped)",
        db.len(),
        db.num_items(),
        db.skipped_lines().len()
    );
    for err in db.skipped_lines().iter().take(5) {
        warn!("  {}", err);
    }

    Ok((db, config))
}

fn run_mine(args: MineArgs) -> Result<()> {
    let (db, mut config) = load(&args.input)?;
    if let Some(min_occupancy) = args.min_occupancy {
        config.min_occupancy = min_occupancy;
    }
    if let Some(min_weighted_support) = args.min_weighted_support {
        config.min_weighted_support = min_weighted_support;
    }
    if config.min_occupancy.is_nan() {
        bail!("--min-occupancy is required (or set min_occupancy in the config file)");
    }

    let outcome = match args.strategy {
        Strategy::FpGrowth => mine(&db, &config)?,
        Strategy::Exhaustive => mine_exhaustive(&db, &config)?,
    };

    if outcome.stats.degenerate {
        warn!("Dataset is degenerate; no itemsets can reach any occupancy");
    }
    if outcome.stats.truncated {
        warn!("Time limit reached; results are incomplete");
    }

    println!("Found {} itemsets", outcome.len());
    println!(
        "Items: {} kept of {}, tree nodes: {}",
        outcome.stats.items_kept, outcome.stats.items_total, outcome.stats.tree_nodes
    );
    println!("Time: {:.3} seconds", outcome.stats.elapsed.as_secs_f64());
    if !outcome.is_empty() && args.top > 0 {
        println!("Top {} itemsets:", args.top.min(outcome.len()));
        for idx in outcome.itemsets.top(args.top) {
            let names: Vec<&str> = outcome
                .itemsets
                .get_itemset(idx)
                .iter()
                .map(|&item| db.item_name(item))
                .collect();
            println!(
                "Itemset: {:?}, WIO: {:.3}",
                names,
                outcome.itemsets.occupancy(idx)
            );
        }
    }

    if let Some(path) = args.output {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_itemsets(BufWriter::new(file), &outcome.itemsets, &db)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Itemsets saved to {}", path.display());
    }

    Ok(())
}

fn run_sweep_command(args: SweepArgs) -> Result<()> {
    let (db, config) = load(&args.input)?;
    // Placeholder until each grid point overrides it.
    let base = MiningConfig { min_occupancy: 0.0, ..config };

    let rows = run_sweep(&db, &base, &args.min_occupancy, &args.min_weighted_support)?;
    for row in &rows {
        println!(
            "MinWIO={} min_ws={}: {} itemsets, {:.3}s, {} nodes",
            row.min_occupancy, row.min_weighted_support, row.num_itemsets, row.time_s, row.tree_nodes
        );
    }

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_sweep_csv(BufWriter::new(file), &rows)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Results saved to {}", args.output.display());
    Ok(())
}
