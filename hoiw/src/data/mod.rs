pub mod database;
pub mod export;
pub mod weights;

pub use database::TransactionDatabase;
pub use export::{write_itemsets, write_sweep_csv};
pub use weights::WeightTable;
