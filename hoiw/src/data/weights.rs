use crate::error::LoadError;
use std::collections::BTreeMap;
use std::path::Path;

/// Item identifier -> non-negative weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    weights: BTreeMap<String, f64>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from pairs, rejecting negative or non-finite weights.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (item, weight) in pairs {
            table.insert(item, weight)?;
        }
        Ok(table)
    }

    /// Parses a JSON object `{"item": weight, ...}`.
    pub fn from_json_str(source: &str) -> Result<Self, LoadError> {
        let raw: BTreeMap<String, f64> = serde_json::from_str(source)?;
        let table = Self::from_pairs(raw)?;
        if table.is_empty() {
            return Err(LoadError::EmptyWeights);
        }
        Ok(table)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    pub fn insert<S: Into<String>>(&mut self, item: S, weight: f64) -> Result<(), LoadError> {
        let item = item.into();
        if !weight.is_finite() || weight < 0.0 {
            return Err(LoadError::InvalidWeight { item, value: weight });
        }
        self.weights.insert(item, weight);
        Ok(())
    }

    pub fn get(&self, item: &str) -> Option<f64> {
        self.weights.get(item).copied()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.weights.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(item, &weight)| (item.as_str(), weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_object() {
        let table = WeightTable::from_json_str(r#"{"a": 0.5, "b": 0.3, "c": 0}"#).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("a"), Some(0.5));
        assert_eq!(table.get("c"), Some(0.0));
        assert_eq!(table.get("z"), None);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = WeightTable::from_json_str(r#"{"a": -1.0}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidWeight { ref item, .. } if item == "a"));
    }

    #[test]
    fn test_non_numeric_weight_rejected() {
        let err = WeightTable::from_json_str(r#"{"a": "heavy"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            WeightTable::from_json_str("{}"),
            Err(LoadError::EmptyWeights)
        ));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = WeightTable::from_json_file("/nonexistent/weights.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
