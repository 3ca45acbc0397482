use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the weight table or the transaction database.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read transactions: {0}")]
    Read(#[source] std::io::Error),

    #[error("weight table is not a JSON object of item -> number: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid weight {value} for item '{item}' (must be finite and >= 0)")]
    InvalidWeight { item: String, value: f64 },

    #[error("weight table is empty")]
    EmptyWeights,
}

/// A single malformed transaction line. Never fatal: the loader skips and counts it.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("line {line}: {reason}")]
pub struct FormatError {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum MiningError {
    /// Empty database or an all-zero occupancy denominator.
    #[error("degenerate dataset: {0}")]
    DegenerateDataset(String),

    /// Exact occupancy exceeded the upper bound computed for the same itemset.
    #[error("bound inconsistency for {itemset:?}: occupancy {occupancy} > bound {bound}")]
    BoundInconsistency {
        itemset: Vec<String>,
        occupancy: f64,
        bound: f64,
    },

    #[error("exhaustive enumeration limited to {limit} items, got {found}")]
    TooManyItems { found: usize, limit: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
