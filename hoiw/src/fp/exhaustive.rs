use super::bounds::{direct_occupancy, meets, supporting_tids};
use super::combinations::for_each_combination;
use super::context::MiningContext;
use super::mining::{MiningOutcome, MiningStats};
use super::storage::ItemsetStorage;
use crate::config::MiningConfig;
use crate::data::TransactionDatabase;
use crate::error::MiningError;
use std::time::Instant;
use tracing::{info, warn};

/// Largest number of surviving items the exhaustive miner accepts.
pub const EXHAUSTIVE_ITEM_LIMIT: usize = 20;

/// Enumerates every combination of pre-filtered items level by level, without
/// any bound pruning, scoring each by direct intersection on the raw database.
///
/// An itemset is reported when it occurs in at least one transaction and its
/// occupancy reaches `min_occupancy`. Output is ordered by length, then by the
/// canonical position of the items.
pub fn mine_exhaustive(
    db: &TransactionDatabase,
    config: &MiningConfig,
) -> Result<MiningOutcome, MiningError> {
    config.validate()?;
    let started = Instant::now();
    let ctx = MiningContext::new(db, config);
    let items = ctx.support().order();

    let mut stats = MiningStats {
        transactions: db.len(),
        items_total: db.num_items(),
        items_kept: items.len(),
        ..MiningStats::default()
    };
    let mut itemsets = ItemsetStorage::new();

    if let Err(err) = ctx.occupancy().ensure_non_degenerate() {
        warn!("{}; no itemsets will be reported", err);
        stats.degenerate = true;
        stats.elapsed = started.elapsed();
        return Ok(MiningOutcome { itemsets, stats });
    }

    if items.len() > EXHAUSTIVE_ITEM_LIMIT {
        return Err(MiningError::TooManyItems {
            found: items.len(),
            limit: EXHAUSTIVE_ITEM_LIMIT,
        });
    }

    let max_len = config
        .max_itemset_length
        .unwrap_or(items.len())
        .min(items.len());

    for k in 1..=max_len {
        let mut occurring = 0usize;
        for_each_combination(items, k, |itemset| {
            stats.candidates_evaluated += 1;
            if supporting_tids(itemset, &ctx).is_empty() {
                return;
            }
            occurring += 1;
            let occupancy = direct_occupancy(itemset, &ctx);
            if meets(occupancy, config.min_occupancy) {
                itemsets.add_itemset(itemset, occupancy);
            }
        });
        // No k-itemset occurs, so no longer one can.
        if occurring == 0 {
            break;
        }
        stats.max_depth = k;
    }

    stats.elapsed = started.elapsed();
    info!(
        "Exhaustive search found {} itemsets ({} combinations) in {:.3}s",
        itemsets.len(),
        stats.candidates_evaluated,
        stats.elapsed.as_secs_f64()
    );
    Ok(MiningOutcome { itemsets, stats })
}
