//! Parameter sweep over `min_occupancy` × `min_weighted_support`.
//!
//! Every grid point is an independent mining run with its own context, so the
//! runs execute concurrently on the rayon pool against one shared database.

use crate::config::MiningConfig;
use crate::data::TransactionDatabase;
use crate::error::MiningError;
use crate::fp::mine;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub min_occupancy: f64,
    pub min_weighted_support: f64,
    pub num_itemsets: usize,
    pub time_s: f64,
    pub tree_nodes: usize,
    pub tree_bytes: usize,
    pub truncated: bool,
}

/// Runs `base` once per grid point, overriding both thresholds. Rows come back
/// in grid order, `min_occupancy` major.
pub fn run_sweep(
    db: &TransactionDatabase,
    base: &MiningConfig,
    min_occupancies: &[f64],
    min_weighted_supports: &[f64],
) -> Result<Vec<SweepRow>, MiningError> {
    let grid: Vec<(f64, f64)> = min_occupancies
        .iter()
        .flat_map(|&occ| min_weighted_supports.iter().map(move |&ws| (occ, ws)))
        .collect();
    info!("Sweeping {} parameter combinations", grid.len());

    grid.par_iter()
        .map(|&(min_occupancy, min_weighted_support)| {
            let config = MiningConfig {
                min_occupancy,
                min_weighted_support,
                ..base.clone()
            };
            let outcome = mine(db, &config)?;
            info!(
                "MinWIO={}, min_ws={}: {} itemsets in {:.3}s",
                min_occupancy,
                min_weighted_support,
                outcome.len(),
                outcome.stats.elapsed.as_secs_f64()
            );
            Ok(SweepRow {
                min_occupancy,
                min_weighted_support,
                num_itemsets: outcome.len(),
                time_s: outcome.stats.elapsed.as_secs_f64(),
                tree_nodes: outcome.stats.tree_nodes,
                tree_bytes: outcome.stats.tree_bytes,
                truncated: outcome.stats.truncated,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeightTable;

    #[test]
    fn test_sweep_matches_individual_runs() {
        let weights = WeightTable::from_pairs([("a", 0.5), ("b", 0.3), ("c", 0.2)]).unwrap();
        let db = TransactionDatabase::from_transactions(
            &weights,
            vec![vec!["a", "b"], vec!["a", "c"], vec!["a", "b", "c"]],
        );
        let base = MiningConfig::new(0.0);

        let rows = run_sweep(&db, &base, &[0.2, 0.3, 0.99], &[0.0, 0.01]).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].min_occupancy, 0.2);
        assert_eq!(rows[1].min_weighted_support, 0.01);

        let counts: Vec<usize> = rows.iter().map(|row| row.num_itemsets).collect();
        assert_eq!(counts, vec![4, 4, 1, 1, 0, 0]);
        assert!(rows.iter().all(|row| row.tree_nodes == 4));
    }
}
