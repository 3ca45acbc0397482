pub mod bounds;
pub mod builder;
pub mod combinations;
pub mod context;
pub mod exhaustive;
pub mod memory;
pub mod mining;
pub mod occupancy;
pub mod prefilter;
pub mod storage;
pub mod tree;


/// Dense item id, assigned by the database loader in first-seen order.
pub type Item = usize;

pub use bounds::{canonicalize, direct_occupancy, estimate_upper_bound, exact_occupancy};
pub use builder::{build_conditional_fp_tree, build_fp_tree};
pub use context::MiningContext;
pub use exhaustive::mine_exhaustive;
pub use mining::{mine, mine_with_context, MiningOutcome, MiningStats};
pub use occupancy::OccupancyTable;
pub use prefilter::ItemSupport;
pub use storage::ItemsetStorage;
pub use tree::{FPNode, FPTree, PrefixPath};
