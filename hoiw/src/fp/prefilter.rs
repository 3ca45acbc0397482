use super::occupancy::OccupancyTable;
use super::Item;
use crate::config::PrefilterPolicy;
use crate::data::TransactionDatabase;
use std::cmp::Ordering;
use tracing::{info, warn};

/// Global per-item statistics and the outcome of the pre-filter.
#[derive(Debug, Clone)]
pub struct ItemSupport {
    weighted_support: Vec<f64>,
    max_weight_bound: Vec<f64>,
    /// Surviving items in canonical order.
    order: Vec<Item>,
    rank: Vec<Option<usize>>,
}

/// `ws(i) = Σ_{t ∋ i} occupancy(t) × w(i)`
pub fn weighted_support(db: &TransactionDatabase, occupancy: &OccupancyTable) -> Vec<f64> {
    let mut ws = vec![0.0; db.num_items()];
    for (tid, transaction) in db.transactions().iter().enumerate() {
        let occ = occupancy.get(tid);
        for &item in transaction {
            ws[item] += occ * db.weight(item);
        }
    }
    ws
}

/// `Σ_{t ∋ i} occupancy(t) × max_{j∈t} w(j)`
///
/// Any itemset containing `i` only occurs in transactions containing `i`, and its
/// average weight there is at most the heaviest item of the transaction.
pub fn max_weight_bound(db: &TransactionDatabase, occupancy: &OccupancyTable) -> Vec<f64> {
    let mut bound = vec![0.0; db.num_items()];
    for (tid, transaction) in db.transactions().iter().enumerate() {
        let heaviest = transaction
            .iter()
            .map(|&item| db.weight(item))
            .fold(0.0_f64, f64::max);
        let contribution = occupancy.get(tid) * heaviest;
        for &item in transaction {
            bound[item] += contribution;
        }
    }
    bound
}

impl ItemSupport {
    pub fn compute(
        db: &TransactionDatabase,
        occupancy: &OccupancyTable,
        min_weighted_support: f64,
        policy: PrefilterPolicy,
    ) -> Self {
        let weighted_support = weighted_support(db, occupancy);
        let max_weight_bound = max_weight_bound(db, occupancy);

        if policy == PrefilterPolicy::WeightedSupport && min_weighted_support > 0.0 {
            warn!(
                "weighted-support pre-filter only bounds single items; itemsets mixing light and heavy items may be lost"
            );
        }

        let key = match policy {
            PrefilterPolicy::TransactionMaxWeight => &max_weight_bound,
            PrefilterPolicy::WeightedSupport => &weighted_support,
        };
        let mut order: Vec<Item> = (0..db.num_items())
            .filter(|&item| key[item] >= min_weighted_support)
            .collect();
        order.sort_by(|&a, &b| {
            weighted_support[b]
                .partial_cmp(&weighted_support[a])
                .unwrap_or(Ordering::Equal)
                .then_with(|| db.item_name(a).cmp(db.item_name(b)))
        });

        let mut rank = vec![None; db.num_items()];
        for (position, &item) in order.iter().enumerate() {
            rank[item] = Some(position);
        }

        info!(
            "Number of items after pruning (min_ws={}, {:?}): {} of {}",
            min_weighted_support,
            policy,
            order.len(),
            db.num_items()
        );

        Self { weighted_support, max_weight_bound, order, rank }
    }

    pub fn weighted_support(&self, item: Item) -> f64 {
        self.weighted_support[item]
    }

    pub fn max_weight_bound(&self, item: Item) -> f64 {
        self.max_weight_bound[item]
    }

    pub fn is_kept(&self, item: Item) -> bool {
        self.rank[item].is_some()
    }

    pub fn rank(&self, item: Item) -> Option<usize> {
        self.rank[item]
    }

    /// Kept items, descending weighted support then identifier.
    pub fn order(&self) -> &[Item] {
        &self.order
    }
}
