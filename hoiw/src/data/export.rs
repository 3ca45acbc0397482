use super::database::TransactionDatabase;
use crate::fp::ItemsetStorage;
use crate::sweep::SweepRow;
use std::io::{self, Write};

/// Writes one `itemset: {a, b} occupancy: 0.123456` line per itemset.
pub fn write_itemsets<W: Write>(
    mut writer: W,
    itemsets: &ItemsetStorage,
    db: &TransactionDatabase,
) -> io::Result<()> {
    for (items, occupancy) in itemsets.iter() {
        let names: Vec<&str> = items.iter().map(|&item| db.item_name(item)).collect();
        writeln!(writer, "itemset: {{{}}} occupancy: {:.6}", names.join(", "), occupancy)?;
    }
    writer.flush()
}

pub fn write_sweep_csv<W: Write>(writer: W, rows: &[SweepRow]) -> io::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WeightTable;

    #[test]
    fn test_itemset_lines() {
        let weights = WeightTable::from_pairs([("a", 0.5), ("b", 0.3)]).unwrap();
        let db = TransactionDatabase::from_transactions(&weights, vec![vec!["a", "b"]]);
        let mut itemsets = ItemsetStorage::new();
        itemsets.add_itemset(&[db.item_id("a").unwrap()], 0.5);
        itemsets.add_itemset(&[db.item_id("a").unwrap(), db.item_id("b").unwrap()], 0.4);

        let mut out = Vec::new();
        write_itemsets(&mut out, &itemsets, &db).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "itemset: {a} occupancy: 0.500000\nitemset: {a, b} occupancy: 0.400000\n"
        );
    }

    #[test]
    fn test_sweep_csv_header() {
        let rows = vec![SweepRow {
            min_occupancy: 0.1,
            min_weighted_support: 0.01,
            num_itemsets: 3,
            time_s: 0.5,
            tree_nodes: 7,
            tree_bytes: 1024,
            truncated: false,
        }];
        let mut out = Vec::new();
        write_sweep_csv(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("min_occupancy,min_weighted_support,num_itemsets,time_s,tree_nodes,tree_bytes,truncated")
        );
        assert_eq!(lines.next(), Some("0.1,0.01,3,0.5,7,1024,false"));
    }
}
