use crate::config::OccupancyDefinition;
use crate::data::TransactionDatabase;
use crate::error::MiningError;
use tracing::{debug, warn};

/// Per-transaction occupancy, computed once from the full database.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyTable {
    values: Vec<f64>,
    total: f64,
    definition: OccupancyDefinition,
}

impl OccupancyTable {
    pub fn compute(db: &TransactionDatabase, definition: OccupancyDefinition) -> Self {
        let masses: Vec<f64> = db
            .transactions()
            .iter()
            .map(|transaction| match definition {
                OccupancyDefinition::Cardinality => transaction.len() as f64,
                OccupancyDefinition::WeightedMass => {
                    transaction.iter().map(|&item| db.weight(item)).sum()
                }
            })
            .collect();
        let total: f64 = masses.iter().sum();

        if total <= 0.0 {
            warn!(
                "Occupancy denominator is zero ({} transactions, {:?}); treating dataset as empty",
                db.len(),
                definition
            );
            return Self { values: vec![0.0; masses.len()], total: 0.0, definition };
        }

        let values: Vec<f64> = masses.into_iter().map(|mass| mass / total).collect();
        debug!(
            "Occupancy ({:?}) for first transactions: {:?}",
            definition,
            &values[..values.len().min(5)]
        );
        Self { values, total, definition }
    }

    pub fn get(&self, tid: usize) -> f64 {
        self.values[tid]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Normalizing denominator: total item count or total weighted mass.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn definition(&self) -> OccupancyDefinition {
        self.definition
    }

    pub fn is_degenerate(&self) -> bool {
        self.total <= 0.0
    }

    pub fn ensure_non_degenerate(&self) -> Result<(), MiningError> {
        if self.is_degenerate() {
            let reason = if self.values.is_empty() {
                "database has no transactions".to_string()
            } else {
                format!("all {} transactions have zero {:?} mass", self.values.len(), self.definition)
            };
            return Err(MiningError::DegenerateDataset(reason));
        }
        Ok(())
    }
}
