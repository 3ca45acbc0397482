use super::Item;
use crate::data::TransactionDatabase;

/// Accepted itemsets in acceptance order, stored in flat arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemsetStorage {
    items: Vec<Item>,
    offsets: Vec<(usize, usize)>,
    occupancies: Vec<f64>,
}

impl ItemsetStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an itemset, which must already be canonical.
    pub fn add_itemset(&mut self, items: &[Item], occupancy: f64) -> usize {
        let start = self.items.len();
        self.items.extend_from_slice(items);
        self.offsets.push((start, items.len()));
        self.occupancies.push(occupancy);
        self.offsets.len() - 1
    }

    pub fn get_itemset(&self, idx: usize) -> &[Item] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub fn occupancy(&self, idx: usize) -> f64 {
        self.occupancies[idx]
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Total number of stored item slots across all itemsets.
    pub fn item_slots(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Item], f64)> + '_ {
        (0..self.len()).map(move |idx| (self.get_itemset(idx), self.occupancy(idx)))
    }

    /// Appends `other` after the current contents, keeping its order.
    pub fn append(&mut self, other: ItemsetStorage) {
        let shift = self.items.len();
        self.items.extend(other.items);
        self.offsets
            .extend(other.offsets.into_iter().map(|(start, len)| (start + shift, len)));
        self.occupancies.extend(other.occupancies);
    }

    pub fn find(&self, items: &[Item]) -> Option<f64> {
        self.iter()
            .find(|(stored, _)| *stored == items)
            .map(|(_, occupancy)| occupancy)
    }

    /// Indices of the `n` highest-occupancy itemsets, ties in acceptance order.
    pub fn top(&self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.sort_by(|&a, &b| {
            self.occupancies[b]
                .partial_cmp(&self.occupancies[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        indices.truncate(n);
        indices
    }

    /// Resolves item ids to their identifiers.
    pub fn named(&self, db: &TransactionDatabase) -> Vec<(Vec<String>, f64)> {
        self.iter()
            .map(|(items, occupancy)| {
                let names = items.iter().map(|&item| db.item_name(item).to_string()).collect();
                (names, occupancy)
            })
            .collect()
    }
}
