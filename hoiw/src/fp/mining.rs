use super::bounds::{canonicalize, estimate_upper_bound, exact_occupancy, meets, tolerance};
use super::builder::{build_conditional_fp_tree, build_fp_tree};
use super::context::MiningContext;
use super::memory::{estimate_fp_tree_size, estimate_itemset_storage_size};
use super::storage::ItemsetStorage;
use super::tree::FPTree;
use super::Item;
use crate::config::{ExecutionMode, MiningConfig};
use crate::data::TransactionDatabase;
use crate::error::MiningError;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// An item of some tree that survived bound pruning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub item: Item,
    pub bound: f64,
    pub count: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiningStats {
    pub transactions: usize,
    pub items_total: usize,
    pub items_kept: usize,
    pub tree_nodes: usize,
    pub tree_bytes: usize,
    pub conditional_trees: usize,
    pub candidates_evaluated: usize,
    pub pruned_by_bound: usize,
    pub max_depth: usize,
    /// Occupancy denominator was zero; no mining took place.
    pub degenerate: bool,
    /// The time limit expired before every top-level item was mined.
    pub truncated: bool,
    pub elapsed: Duration,
}

impl MiningStats {
    fn absorb(&mut self, other: &MiningStats) {
        self.conditional_trees += other.conditional_trees;
        self.candidates_evaluated += other.candidates_evaluated;
        self.pruned_by_bound += other.pruned_by_bound;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.truncated |= other.truncated;
    }
}

#[derive(Debug, Clone)]
pub struct MiningOutcome {
    pub itemsets: ItemsetStorage,
    pub stats: MiningStats,
}

impl MiningOutcome {
    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }
}

/// One pending unit of the search: a prefix, the tree conditioned on it, and the
/// candidates of that tree not yet expanded. The frame owns its tree.
pub(crate) struct Frame {
    prefix: Vec<Item>,
    tree: FPTree,
    candidates: Vec<Candidate>,
    cursor: usize,
}

pub(crate) struct Miner<'c, 'a> {
    ctx: &'c MiningContext<'a>,
    threshold: f64,
    max_len: Option<usize>,
    deadline: Option<Instant>,
}

/// Mines a loaded database end to end: occupancy, pre-filter, tree, search.
pub fn mine(db: &TransactionDatabase, config: &MiningConfig) -> Result<MiningOutcome, MiningError> {
    config.validate()?;
    let ctx = MiningContext::new(db, config);
    mine_with_context(&ctx, config)
}

pub fn mine_with_context(
    ctx: &MiningContext<'_>,
    config: &MiningConfig,
) -> Result<MiningOutcome, MiningError> {
    let started = Instant::now();
    let db = ctx.database();
    let mut stats = MiningStats {
        transactions: db.len(),
        items_total: db.num_items(),
        items_kept: ctx.support().order().len(),
        ..MiningStats::default()
    };

    if let Err(err) = ctx.occupancy().ensure_non_degenerate() {
        warn!("{}; no itemsets will be reported", err);
        stats.degenerate = true;
        stats.elapsed = started.elapsed();
        return Ok(MiningOutcome { itemsets: ItemsetStorage::new(), stats });
    }

    let tree = build_fp_tree(ctx);
    stats.tree_nodes = tree.node_count();
    stats.tree_bytes = estimate_fp_tree_size(&tree);

    let miner = Miner::new(ctx, config);
    let (itemsets, run_stats) = match config.execution {
        ExecutionMode::Sequential => miner.run_sequential(tree)?,
        ExecutionMode::Parallel => match config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                pool.install(|| miner.run_parallel(&tree))?
            }
            None => miner.run_parallel(&tree)?,
        },
    };

    stats.absorb(&run_stats);
    stats.elapsed = started.elapsed();
    info!(
        "Found {} itemsets ({} candidates evaluated, {} pruned, {} conditional trees) in {:.3}s",
        itemsets.len(),
        stats.candidates_evaluated,
        stats.pruned_by_bound,
        stats.conditional_trees,
        stats.elapsed.as_secs_f64()
    );
    debug!(
        "Memory: tree ~{} KB, results ~{} KB",
        stats.tree_bytes / 1024,
        estimate_itemset_storage_size(&itemsets) / 1024
    );
    Ok(MiningOutcome { itemsets, stats })
}

impl<'c, 'a> Miner<'c, 'a> {
    pub(crate) fn new(ctx: &'c MiningContext<'a>, config: &MiningConfig) -> Self {
        Self {
            ctx,
            threshold: config.min_occupancy,
            max_len: config.max_itemset_length,
            deadline: config.time_limit().map(|limit| Instant::now() + limit),
        }
    }

    /// Items of `tree` whose bound reaches the threshold, smallest accumulated
    /// count first, ties by item identifier.
    pub(crate) fn candidates(&self, tree: &FPTree, stats: &mut MiningStats) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = Vec::new();
        for item in tree.items() {
            let bound = estimate_upper_bound(item, tree);
            if !meets(bound, self.threshold) {
                stats.pruned_by_bound += 1;
                continue;
            }
            candidates.push(Candidate { item, bound, count: tree.item_count(item) });
        }

        candidates.sort_by(|a, b| {
            a.count
                .total_cmp(&b.count)
                .then_with(|| self.ctx.item_name(a.item).cmp(self.ctx.item_name(b.item)))
        });
        candidates
    }

    fn run_sequential(&self, tree: FPTree) -> Result<(ItemsetStorage, MiningStats), MiningError> {
        let mut stats = MiningStats::default();
        let mut results = ItemsetStorage::new();

        let candidates = self.candidates(&tree, &mut stats);
        info!("Number of items after WIOUB pruning: {}", candidates.len());

        let mut stack = vec![Frame { prefix: Vec::new(), tree, candidates, cursor: 0 }];
        self.drain(&mut stack, &mut results, &mut stats, true)?;
        Ok((results, stats))
    }

    fn run_parallel(&self, tree: &FPTree) -> Result<(ItemsetStorage, MiningStats), MiningError> {
        let mut stats = MiningStats::default();
        let candidates = self.candidates(tree, &mut stats);
        info!(
            "Number of items after WIOUB pruning: {}, using {} threads",
            candidates.len(),
            rayon::current_num_threads()
        );

        let branches: Vec<(ItemsetStorage, MiningStats)> = candidates
            .par_iter()
            .map(|&candidate| self.mine_branch(tree, candidate))
            .collect::<Result<_, _>>()?;

        // Merge in candidate order so the output matches the sequential run.
        let mut results = ItemsetStorage::new();
        for (branch_results, branch_stats) in branches {
            results.append(branch_results);
            stats.absorb(&branch_stats);
        }
        Ok((results, stats))
    }

    fn mine_branch(
        &self,
        tree: &FPTree,
        candidate: Candidate,
    ) -> Result<(ItemsetStorage, MiningStats), MiningError> {
        let mut stats = MiningStats::default();
        let mut results = ItemsetStorage::new();

        if self.deadline_passed() {
            stats.truncated = true;
            return Ok((results, stats));
        }

        if let Some(child) = self.expand(&[], tree, candidate, &mut results, &mut stats)? {
            let mut stack = vec![child];
            self.drain(&mut stack, &mut results, &mut stats, false)?;
        }
        Ok((results, stats))
    }

    /// Runs the work stack to exhaustion, depth first. When `watch_deadline` is
    /// set the time limit is checked before each item of the bottom frame.
    fn drain(
        &self,
        stack: &mut Vec<Frame>,
        results: &mut ItemsetStorage,
        stats: &mut MiningStats,
        watch_deadline: bool,
    ) -> Result<(), MiningError> {
        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };

            if frame.cursor == frame.candidates.len() {
                stack.pop();
                continue;
            }

            if watch_deadline && depth == 1 && self.deadline_passed() {
                warn!(
                    "Time limit reached after {} of {} top-level items",
                    frame.cursor,
                    frame.candidates.len()
                );
                stats.truncated = true;
                break;
            }

            let candidate = frame.candidates[frame.cursor];
            frame.cursor += 1;

            if let Some(child) = self.expand(&frame.prefix, &frame.tree, candidate, results, stats)? {
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Evaluates `prefix + [candidate.item]` and returns the frame for its
    /// conditional tree when the branch is worth descending into.
    pub(crate) fn expand(
        &self,
        prefix: &[Item],
        tree: &FPTree,
        candidate: Candidate,
        results: &mut ItemsetStorage,
        stats: &mut MiningStats,
    ) -> Result<Option<Frame>, MiningError> {
        let mut new_prefix = prefix.to_vec();
        new_prefix.push(candidate.item);

        let itemset = canonicalize(&new_prefix, self.ctx);
        let occupancy = exact_occupancy(&itemset, tree, self.ctx);
        stats.candidates_evaluated += 1;
        stats.max_depth = stats.max_depth.max(new_prefix.len());

        if occupancy > candidate.bound + tolerance(candidate.bound) {
            return Err(MiningError::BoundInconsistency {
                itemset: self.ctx.names(&itemset),
                occupancy,
                bound: candidate.bound,
            });
        }

        if meets(occupancy, self.threshold) {
            debug!(
                "Added itemset: {:?}, WIO: {:.3}, WIOUB: {:.3}",
                self.ctx.names(&itemset),
                occupancy,
                candidate.bound
            );
            results.add_itemset(&itemset, occupancy);
        } else {
            debug!(
                "Skipped itemset: {:?}, WIO: {:.3}, WIOUB: {:.3}",
                self.ctx.names(&itemset),
                occupancy,
                candidate.bound
            );
        }

        if self.max_len.is_some_and(|max_len| new_prefix.len() >= max_len) {
            return Ok(None);
        }

        let prefix_paths = tree.get_prefix_paths(candidate.item);
        if prefix_paths.is_empty() {
            return Ok(None);
        }

        let cond_tree = build_conditional_fp_tree(&prefix_paths, new_prefix.clone(), self.ctx);
        stats.conditional_trees += 1;
        if cond_tree.is_empty() {
            return Ok(None);
        }

        let candidates = self.candidates(&cond_tree, stats);
        if candidates.is_empty() {
            return Ok(None);
        }

        Ok(Some(Frame { prefix: new_prefix, tree: cond_tree, candidates, cursor: 0 }))
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}
