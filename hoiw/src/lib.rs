//! High-occupancy weighted itemset mining.
//!
//! Transactions are compressed into an FP-tree whose nodes accumulate
//! per-transaction occupancy. The miner walks conditional trees depth first,
//! pruning every branch whose occupancy upper bound falls below the threshold.

pub mod config;
pub mod data;
pub mod error;
pub mod fp;
pub mod sweep;

#[cfg(feature = "python")]
mod python;

pub use config::{ExecutionMode, MiningConfig, OccupancyDefinition, PrefilterPolicy};
pub use data::{TransactionDatabase, WeightTable};
pub use error::{ConfigError, FormatError, LoadError, MiningError};
pub use fp::{mine, mine_exhaustive, ItemsetStorage, MiningContext, MiningOutcome, MiningStats};
pub use sweep::{run_sweep, SweepRow};
