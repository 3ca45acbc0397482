use super::context::MiningContext;
use super::tree::{FPTree, PrefixPath};
use super::Item;
use tracing::{debug, info};

/// Builds the top-level tree from every transaction, restricted to the items
/// that survived the pre-filter and ordered canonically.
pub fn build_fp_tree(ctx: &MiningContext<'_>) -> FPTree {
    let db = ctx.database();
    let support = ctx.support();
    let weights = ctx.weights();
    let mut fp_tree = FPTree::new();
    let mut inserted = 0usize;

    for (tid, transaction) in db.transactions().iter().enumerate() {
        let mut ranked: Vec<(usize, Item)> = transaction
            .iter()
            .filter_map(|&item| support.rank(item).map(|rank| (rank, item)))
            .collect();

        if ranked.is_empty() {
            continue;
        }

        ranked.sort_unstable();
        let sorted_items: Vec<Item> = ranked.into_iter().map(|(_, item)| item).collect();
        fp_tree.insert_transaction(&sorted_items, ctx.occupancy().get(tid), tid, weights);
        inserted += 1;
    }

    info!(
        "Built FP-tree: {} transactions, {} items, {} nodes",
        inserted,
        fp_tree.header_table.len(),
        fp_tree.node_count()
    );
    debug!(
        "FP-tree structure (first 10 nodes):\n{}",
        fp_tree.render(10, |item| ctx.item_name(item).to_string())
    );

    fp_tree
}

/// Builds the conditional tree of `condition` from the prefix paths of its last
/// item. Nodes are rebuilt from the paths; nothing is shared with the source tree.
pub fn build_conditional_fp_tree(
    prefix_paths: &[PrefixPath],
    condition: Vec<Item>,
    ctx: &MiningContext<'_>,
) -> FPTree {
    let weights = ctx.weights();
    let support = ctx.support();
    let condition_weight = condition
        .iter()
        .map(|&item| weights[item])
        .fold(0.0_f64, f64::max);
    let mut conditional_tree = FPTree::conditional(condition, condition_weight);

    for path in prefix_paths {
        let mut items = path.items.clone();
        items.sort_by_key(|&item| support.rank(item));
        conditional_tree.insert_path(&items, path.count, &path.tids, weights);
    }

    for node in conditional_tree.nodes.iter_mut() {
        node.tids.sort_unstable();
    }

    conditional_tree
}
