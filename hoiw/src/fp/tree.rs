use super::Item;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

/// One arena slot. `parent` and `children` are indices into [`FPTree::nodes`].
#[derive(Debug, Clone)]
pub struct FPNode {
    pub item: Option<Item>,
    /// Accumulated occupancy of the transactions threaded through this node.
    pub count: f64,
    pub parent: Option<usize>,
    pub children: BTreeMap<Item, usize>,
    /// Ids of the transactions threaded through this node.
    pub tids: Vec<usize>,
    /// Largest item weight on the root -> node path, this node included.
    pub path_weight: f64,
}

/// A prefix path ending just above a node, with that node's count and threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixPath {
    pub items: Vec<Item>,
    pub count: f64,
    pub tids: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct FPTree {
    pub nodes: Vec<FPNode>,
    pub header_table: HashMap<Item, Vec<usize>>,
    pub item_counts: HashMap<Item, f64>,
    pub root_index: usize,
    /// Items every transaction in this tree is known to contain.
    pub condition: Vec<Item>,
    /// Largest weight among `condition`.
    pub condition_weight: f64,
}

impl FPNode {
    pub fn new_root() -> Self {
        Self {
            item: None,
            count: 0.0,
            parent: None,
            children: BTreeMap::new(),
            tids: Vec::new(),
            path_weight: 0.0,
        }
    }

    pub fn new_item(item: Item, parent: usize, path_weight: f64) -> Self {
        Self {
            item: Some(item),
            count: 0.0,
            parent: Some(parent),
            children: BTreeMap::new(),
            tids: Vec::new(),
            path_weight,
        }
    }
}

impl Default for FPTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FPTree {
    pub fn new() -> Self {
        Self::conditional(Vec::new(), 0.0)
    }

    pub fn conditional(condition: Vec<Item>, condition_weight: f64) -> Self {
        Self {
            nodes: vec![FPNode::new_root()],
            header_table: HashMap::new(),
            item_counts: HashMap::new(),
            root_index: 0,
            condition,
            condition_weight,
        }
    }

    /// Inserts one transaction. `transaction` must already be in canonical order.
    pub fn insert_transaction(
        &mut self,
        transaction: &[Item],
        occupancy: f64,
        tid: usize,
        weights: &[f64],
    ) {
        self.insert_path(transaction, occupancy, &[tid], weights);
    }

    /// Inserts a weighted path carrying several transaction threads at once.
    pub fn insert_path(&mut self, path: &[Item], count: f64, tids: &[usize], weights: &[f64]) {
        let mut current_index = self.root_index;

        for &item in path {
            *self.item_counts.entry(item).or_insert(0.0) += count;

            let child_index = match self.nodes[current_index].children.get(&item) {
                Some(&child_index) => child_index,
                None => {
                    let path_weight = self.nodes[current_index].path_weight.max(weights[item]);
                    let new_index = self.nodes.len();
                    self.nodes
                        .push(FPNode::new_item(item, current_index, path_weight));
                    self.nodes[current_index].children.insert(item, new_index);
                    self.header_table.entry(item).or_default().push(new_index);
                    new_index
                }
            };

            let child = &mut self.nodes[child_index];
            child.count += count;
            child.tids.extend_from_slice(tids);
            current_index = child_index;
        }
    }

    pub fn get_prefix_paths(&self, item: Item) -> Vec<PrefixPath> {
        self.header_table.get(&item).map_or(Vec::new(), |nodes| {
            nodes
                .iter()
                .filter_map(|&idx| {
                    let mut items = Vec::new();
                    let mut current = self.nodes[idx].parent;

                    while let Some(i) = current {
                        if let Some(item) = self.nodes[i].item {
                            items.push(item);
                        }
                        current = self.nodes[i].parent;
                    }

                    items.reverse();
                    let node = &self.nodes[idx];
                    (!items.is_empty()).then(|| PrefixPath {
                        items,
                        count: node.count,
                        tids: node.tids.clone(),
                    })
                })
                .collect()
        })
    }

    /// Sorted ids of every transaction threaded through a node labelled `item`.
    pub fn item_tids(&self, item: Item) -> Vec<usize> {
        let mut tids: Vec<usize> = self
            .header_table
            .get(&item)
            .into_iter()
            .flatten()
            .flat_map(|&idx| self.nodes[idx].tids.iter().copied())
            .collect();
        tids.sort_unstable();
        tids
    }

    /// Sorted ids of every transaction in the tree.
    pub fn all_tids(&self) -> Vec<usize> {
        let mut tids: Vec<usize> = self.nodes[self.root_index]
            .children
            .values()
            .flat_map(|&idx| self.nodes[idx].tids.iter().copied())
            .collect();
        tids.sort_unstable();
        tids
    }

    pub fn item_count(&self, item: Item) -> f64 {
        self.item_counts.get(&item).copied().unwrap_or(0.0)
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.header_table.keys().copied()
    }

    pub fn contains_item(&self, item: Item) -> bool {
        self.header_table.contains_key(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.header_table.is_empty()
    }

    /// Number of item nodes, root excluded.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Indented `item: count` listing of the first `max_nodes` nodes, depth first.
    pub fn render<F>(&self, max_nodes: usize, name: F) -> String
    where
        F: Fn(Item) -> String,
    {
        let mut out = String::new();
        let mut remaining = max_nodes;
        let mut stack: Vec<(usize, usize)> = self.nodes[self.root_index]
            .children
            .values()
            .rev()
            .map(|&idx| (idx, 0))
            .collect();

        while let Some((idx, depth)) = stack.pop() {
            if remaining == 0 {
                break;
            }
            let node = &self.nodes[idx];
            if let Some(item) = node.item {
                let _ = writeln!(out, "{}{}: {:.3}", "  ".repeat(depth), name(item), node.count);
                remaining -= 1;
            }
            stack.extend(node.children.values().rev().map(|&child| (child, depth + 1)));
        }
        out
    }
}
