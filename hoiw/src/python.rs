use crate::config::{MiningConfig, OccupancyDefinition};
use crate::data::{TransactionDatabase, WeightTable};
use crate::fp::mine;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::{pymodule, types::PyModule, Bound, PyResult};
use std::collections::HashMap;

#[pymodule]
fn hoiw<'py>(m: &Bound<'py, PyModule>) -> PyResult<()> {
    #[pyfn(m)]
    #[pyo3(name = "mine", signature = (
        transactions,
        weights,
        min_occupancy,
        min_weighted_support = 0.01,
        max_itemset_length = None,
        occupancy_definition = "cardinality",
    ))]
    fn mine_py(
        transactions: Vec<Vec<String>>,
        weights: HashMap<String, f64>,
        min_occupancy: f64,
        min_weighted_support: f64,
        max_itemset_length: Option<usize>,
        occupancy_definition: &str,
    ) -> PyResult<Vec<(Vec<String>, f64)>> {
        let definition = match occupancy_definition {
            "cardinality" => OccupancyDefinition::Cardinality,
            "weighted-mass" | "weighted_mass" => OccupancyDefinition::WeightedMass,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown occupancy definition '{}'",
                    other
                )))
            }
        };

        let weights =
            WeightTable::from_pairs(weights).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let db = TransactionDatabase::from_transactions(&weights, transactions);

        let mut config = MiningConfig::new(min_occupancy)
            .with_min_weighted_support(min_weighted_support)
            .with_occupancy_definition(definition);
        config.max_itemset_length = max_itemset_length;

        let outcome = mine(&db, &config).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(outcome.itemsets.named(&db))
    }

    Ok(())
}
