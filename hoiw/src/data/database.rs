//! Transaction database loading.
//!
//! Input lines look like `T1: a b c`. The text before the first `:` is the
//! transaction label, the rest is a whitespace-separated item list. Items
//! missing from the weight table are dropped, and transactions left empty are
//! omitted. Transaction ids are assigned 0-based in load order.

use super::weights::WeightTable;
use crate::error::{FormatError, LoadError};
use crate::fp::Item;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct TransactionDatabase {
    vocabulary: Vec<String>,
    index: HashMap<String, Item>,
    weights: Vec<f64>,
    transactions: Vec<Vec<Item>>,
    labels: Vec<String>,
    skipped: Vec<FormatError>,
    dropped_empty: usize,
}

impl TransactionDatabase {
    /// Builds a database from in-memory transactions.
    pub fn from_transactions<T, S>(weights: &WeightTable, transactions: T) -> Self
    where
        T: IntoIterator,
        T::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut db = Self::default();
        for (idx, transaction) in transactions.into_iter().enumerate() {
            db.push_transaction(format!("T{}", idx + 1), transaction, weights);
        }
        db
    }

    /// Reads `<id>: items` lines. Read failures are fatal; a line that is not
    /// valid UTF-8 or has no `:` is skipped and recorded.
    pub fn from_reader<R: BufRead>(reader: R, weights: &WeightTable) -> Result<Self, LoadError> {
        Self::read_lines(reader, weights).map_err(LoadError::Read)
    }

    pub fn from_file<P: AsRef<Path>>(path: P, weights: &WeightTable) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let io_error = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_error)?;
        Self::read_lines(std::io::BufReader::new(file), weights).map_err(io_error)
    }

    fn read_lines<R: BufRead>(mut reader: R, weights: &WeightTable) -> std::io::Result<Self> {
        let mut db = Self::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let parsed = match std::str::from_utf8(&buf) {
                Ok(line) => parse_line(line_no, line),
                Err(_) => Err(FormatError {
                    line: line_no,
                    reason: "invalid UTF-8".to_string(),
                }),
            };
            match parsed {
                Ok(Some((label, items))) => db.push_transaction(label, items, weights),
                Ok(None) => {}
                Err(err) => {
                    debug!("skipping transaction line: {}", err);
                    db.skipped.push(err);
                }
            }
        }

        if !db.skipped.is_empty() {
            warn!("Skipped {} malformed transaction lines", db.skipped.len());
        }
        if db.dropped_empty > 0 {
            debug!(
                "Omitted {} transactions with no weighted items",
                db.dropped_empty
            );
        }
        Ok(db)
    }

    fn push_transaction<I, S>(&mut self, label: String, items: I, weights: &WeightTable)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut transaction: Vec<Item> = items
            .into_iter()
            .filter_map(|name| self.intern(name.as_ref(), weights))
            .collect();
        transaction.sort_unstable();
        transaction.dedup();

        if transaction.is_empty() {
            self.dropped_empty += 1;
            return;
        }
        self.transactions.push(transaction);
        self.labels.push(label);
    }

    fn intern(&mut self, name: &str, weights: &WeightTable) -> Option<Item> {
        if let Some(&item) = self.index.get(name) {
            return Some(item);
        }
        let weight = weights.get(name)?;
        let item = self.vocabulary.len();
        self.vocabulary.push(name.to_string());
        self.weights.push(weight);
        self.index.insert(name.to_string(), item);
        Some(item)
    }

    pub fn transactions(&self) -> &[Vec<Item>] {
        &self.transactions
    }

    pub fn transaction(&self, tid: usize) -> &[Item] {
        &self.transactions[tid]
    }

    pub fn label(&self, tid: usize) -> &str {
        &self.labels[tid]
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn num_items(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn item_name(&self, item: Item) -> &str {
        &self.vocabulary[item]
    }

    pub fn item_id(&self, name: &str) -> Option<Item> {
        self.index.get(name).copied()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn weight(&self, item: Item) -> f64 {
        self.weights[item]
    }

    /// Lines that could not be parsed.
    pub fn skipped_lines(&self) -> &[FormatError] {
        &self.skipped
    }

    /// Transactions omitted because none of their items carried a weight.
    pub fn dropped_empty(&self) -> usize {
        self.dropped_empty
    }
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<(String, Vec<&str>)>, FormatError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (label, items) = line.split_once(':').ok_or_else(|| FormatError {
        line: line_no,
        reason: "expected `<id>: <items...>`".to_string(),
    })?;
    Ok(Some((label.trim().to_string(), items.split_whitespace().collect())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn weights() -> WeightTable {
        WeightTable::from_pairs([("a", 0.5), ("b", 0.3), ("c", 0.2)]).unwrap()
    }

    #[test]
    fn test_parse_lines() {
        let input = "T1: a b\nT2: a c\n\nT3: a b c\n";
        let db = TransactionDatabase::from_reader(input.as_bytes(), &weights()).unwrap();

        assert_eq!(db.len(), 3);
        assert_eq!(db.label(2), "T3");
        assert_eq!(db.num_items(), 3);
        let a = db.item_id("a").unwrap();
        assert!(db.transaction(1).contains(&a));
        assert!(db.skipped_lines().is_empty());
    }

    #[test]
    fn test_malformed_lines_are_counted_not_fatal() {
        let input = "T1: a b\ngarbage without separator\nT2: c\n";
        let db = TransactionDatabase::from_reader(input.as_bytes(), &weights()).unwrap();

        assert_eq!(db.len(), 2);
        assert_eq!(db.skipped_lines().len(), 1);
        assert_eq!(db.skipped_lines()[0].line, 2);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let input: &[u8] = b"T1: a b\nT2: a \xff\xfe\nT3: b\n";
        let db = TransactionDatabase::from_reader(input, &weights()).unwrap();

        assert_eq!(db.len(), 2);
        assert_eq!(db.label(1), "T3");
        assert_eq!(
            db.skipped_lines(),
            &[FormatError { line: 2, reason: "invalid UTF-8".to_string() }]
        );
    }

    #[test]
    fn test_crlf_lines() {
        let input = "T1: a b\r\nT2: c\r\n";
        let db = TransactionDatabase::from_reader(input.as_bytes(), &weights()).unwrap();

        assert_eq!(db.len(), 2);
        assert_eq!(db.transaction(1).len(), 1);
        assert!(db.skipped_lines().is_empty());
    }

    #[test]
    fn test_unweighted_items_dropped_and_empty_transactions_omitted() {
        let input = "T1: a x y\nT2: x y\nT3: b b c\n";
        let db = TransactionDatabase::from_reader(input.as_bytes(), &weights()).unwrap();

        assert_eq!(db.len(), 2);
        assert_eq!(db.dropped_empty(), 1);
        assert_eq!(db.transaction(0).len(), 1);
        // duplicate `b` collapsed
        assert_eq!(db.transaction(1).len(), 2);
        assert_eq!(db.item_id("x"), None);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "T1: a b c").unwrap();
        writeln!(file, "T2: b").unwrap();

        let db = TransactionDatabase::from_file(file.path(), &weights()).unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.weight(db.item_id("b").unwrap()), 0.3);
    }

    #[test]
    fn test_missing_file() {
        let err = TransactionDatabase::from_file("/nonexistent/tx.txt", &weights()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
