//! Occupancy of itemsets and the upper bound used to prune the search.
//!
//! For an itemset `S` the weighted itemset occupancy is
//! `WIO(S) = Σ_{t ⊇ S} occupancy(t) × avg_{i∈S} w(i)`.
//! Every bound here satisfies `WIOUB ≥ WIO` for the itemsets it covers.

use super::context::MiningContext;
use super::tree::FPTree;
use super::Item;
use std::cmp::Ordering;

const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Absolute slack allowed when comparing against `threshold`: relative to its
/// magnitude, never below machine epsilon.
pub fn tolerance(threshold: f64) -> f64 {
    (RELATIVE_TOLERANCE * threshold.abs()).max(f64::EPSILON)
}

/// `value ≥ threshold`, forgiving float noise.
pub fn meets(value: f64, threshold: f64) -> bool {
    value >= threshold - tolerance(threshold)
}

/// Deduplicates and sorts into canonical order: descending global weighted
/// support, ties by item identifier. Items dropped by the pre-filter go last.
pub fn canonicalize(itemset: &[Item], ctx: &MiningContext<'_>) -> Vec<Item> {
    let support = ctx.support();
    let mut items = itemset.to_vec();
    items.sort_by(|&a, &b| match (support.rank(a), support.rank(b)) {
        (Some(ra), Some(rb)) => ra.cmp(&rb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => ctx.item_name(a).cmp(ctx.item_name(b)),
    });
    items.dedup();
    items
}

pub fn average_weight(itemset: &[Item], weights: &[f64]) -> f64 {
    if itemset.is_empty() {
        return 0.0;
    }
    itemset.iter().map(|&item| weights[item]).sum::<f64>() / itemset.len() as f64
}

pub fn max_weight(itemset: &[Item], weights: &[f64]) -> f64 {
    itemset.iter().map(|&item| weights[item]).fold(0.0_f64, f64::max)
}

/// Upper bound on the occupancy of `tree.condition ∪ {item} ∪ Q` for every `Q`
/// drawn from the prefix paths of `item`.
///
/// Each node labelled `item` contributes its accumulated occupancy times the
/// heaviest weight that can appear in an itemset through it.
pub fn estimate_upper_bound(item: Item, tree: &FPTree) -> f64 {
    tree.header_table.get(&item).map_or(0.0, |nodes| {
        nodes
            .iter()
            .map(|&idx| {
                let node = &tree.nodes[idx];
                node.count * node.path_weight.max(tree.condition_weight)
            })
            .sum()
    })
}

/// Exact occupancy of `itemset`, read from the threads of `tree`.
///
/// Items in `tree.condition` are implied by every thread; the remaining items
/// are intersected over their header-table nodes.
pub fn exact_occupancy(itemset: &[Item], tree: &FPTree, ctx: &MiningContext<'_>) -> f64 {
    let itemset = canonicalize(itemset, ctx);
    let residual: Vec<Item> = itemset
        .iter()
        .copied()
        .filter(|item| !tree.condition.contains(item))
        .collect();

    let tids = match residual.split_first() {
        None => tree.all_tids(),
        Some((&first, rest)) => rest.iter().fold(tree.item_tids(first), |acc, &item| {
            if acc.is_empty() {
                acc
            } else {
                intersect_sorted(&acc, &tree.item_tids(item))
            }
        }),
    };

    occupancy_over(&tids, &itemset, ctx)
}

/// Exact occupancy by scanning the raw database. Reference for tree results.
pub fn direct_occupancy(itemset: &[Item], ctx: &MiningContext<'_>) -> f64 {
    let itemset = canonicalize(itemset, ctx);
    occupancy_over(&supporting_tids(&itemset, ctx), &itemset, ctx)
}

/// Ids of the raw transactions containing every item of `itemset`, ascending.
pub fn supporting_tids(itemset: &[Item], ctx: &MiningContext<'_>) -> Vec<usize> {
    ctx.database()
        .transactions()
        .iter()
        .enumerate()
        .filter(|(_, transaction)| itemset.iter().all(|item| transaction.binary_search(item).is_ok()))
        .map(|(tid, _)| tid)
        .collect()
}

/// `Σ_{t ∩ S ≠ ∅} occupancy(t) × max_{i∈S} w(i)` over the raw database.
pub fn itemset_upper_bound(itemset: &[Item], ctx: &MiningContext<'_>) -> f64 {
    let heaviest = max_weight(itemset, ctx.weights());
    ctx.database()
        .transactions()
        .iter()
        .enumerate()
        .filter(|(_, transaction)| itemset.iter().any(|item| transaction.binary_search(item).is_ok()))
        .map(|(tid, _)| ctx.occupancy().get(tid) * heaviest)
        .sum()
}

fn occupancy_over(tids: &[usize], itemset: &[Item], ctx: &MiningContext<'_>) -> f64 {
    if tids.is_empty() || itemset.is_empty() {
        return 0.0;
    }
    let avg = average_weight(itemset, ctx.weights());
    tids.iter().map(|&tid| ctx.occupancy().get(tid) * avg).sum()
}

pub(crate) fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
