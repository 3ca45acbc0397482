use super::occupancy::OccupancyTable;
use super::prefilter::ItemSupport;
use super::Item;
use crate::config::MiningConfig;
use crate::data::TransactionDatabase;

/// Read-only state shared by every stage of one mining run.
///
/// Nothing here is global: concurrent runs over the same database each own a
/// context and only borrow the database.
#[derive(Debug, Clone)]
pub struct MiningContext<'a> {
    db: &'a TransactionDatabase,
    occupancy: OccupancyTable,
    support: ItemSupport,
}

impl<'a> MiningContext<'a> {
    pub fn new(db: &'a TransactionDatabase, config: &MiningConfig) -> Self {
        let occupancy = OccupancyTable::compute(db, config.occupancy_definition);
        let support = ItemSupport::compute(
            db,
            &occupancy,
            config.min_weighted_support,
            config.prefilter,
        );
        Self { db, occupancy, support }
    }

    pub fn database(&self) -> &'a TransactionDatabase {
        self.db
    }

    pub fn occupancy(&self) -> &OccupancyTable {
        &self.occupancy
    }

    pub fn support(&self) -> &ItemSupport {
        &self.support
    }

    pub fn weights(&self) -> &'a [f64] {
        self.db.weights()
    }

    pub fn weight(&self, item: Item) -> f64 {
        self.db.weight(item)
    }

    pub fn item_name(&self, item: Item) -> &'a str {
        self.db.item_name(item)
    }

    pub fn names(&self, items: &[Item]) -> Vec<String> {
        items.iter().map(|&item| self.item_name(item).to_string()).collect()
    }

    pub fn is_degenerate(&self) -> bool {
        self.occupancy.is_degenerate()
    }
}
