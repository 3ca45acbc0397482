use super::storage::ItemsetStorage;
use super::tree::FPTree;
use super::Item;
use std::mem::size_of;

/// Approximate heap footprint of a tree: node slots, thread lists, child maps
/// and header links.
pub fn estimate_fp_tree_size(tree: &FPTree) -> usize {
    let node_size = size_of::<super::tree::FPNode>();
    let child_entry = size_of::<Item>() + size_of::<usize>();
    let header_overhead = 64;

    let threads: usize = tree.nodes.iter().map(|node| node.tids.capacity()).sum();
    let children: usize = tree.nodes.iter().map(|node| node.children.len()).sum();
    let header_links: usize = tree.header_table.values().map(Vec::len).sum();

    tree.nodes.capacity() * node_size
        + threads * size_of::<usize>()
        + children * child_entry
        + header_links * size_of::<usize>()
        + tree.header_table.len() * (size_of::<Item>() + size_of::<Vec<usize>>())
        + header_overhead
}

pub fn estimate_itemset_storage_size(storage: &ItemsetStorage) -> usize {
    let offset_size = size_of::<(usize, usize)>();
    let item_size = size_of::<Item>();
    storage.len() * (offset_size + size_of::<f64>()) + storage.item_slots() * item_size
}
