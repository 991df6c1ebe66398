//! CSV persistence
//!
//! The pipeline's sink boundary: tables go out as delimited text with a
//! header row, and the orders table can be read back in for offline analysis
//! without re-fetching from the API.

use crate::basket::PairCount;
use crate::error::Result;
use crate::flatten::TransactionRow;
use crate::temporal::{DayTimeCount, TimeCount, YearDayTimeCount};
use std::path::Path;
use tracing::info;

/// Write the flattened transaction table
pub fn write_rows(path: &Path, rows: &[TransactionRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(rows = rows.len(), path = %path.display(), "Wrote transaction table");
    Ok(())
}

/// Read a previously written transaction table
pub fn read_rows(path: &Path) -> Result<Vec<TransactionRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Write a pair-count table with `first_item,second_item,count` columns
pub fn write_pairs(path: &Path, pairs: &[PairCount]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["first_item", "second_item", "count"])?;
    for pc in pairs {
        writer.write_record([
            pc.pair.first.as_str(),
            pc.pair.second.as_str(),
            &pc.count.to_string(),
        ])?;
    }
    writer.flush()?;
    info!(pairs = pairs.len(), path = %path.display(), "Wrote pair counts");
    Ok(())
}

/// Write the by-time grouping
pub fn write_time_counts(path: &Path, counts: &[TimeCount]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for count in counts {
        writer.serialize(count)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the by-(day, time) grouping
pub fn write_day_time_counts(path: &Path, counts: &[DayTimeCount]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for count in counts {
        writer.serialize(count)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the by-(year, day, time) grouping
pub fn write_year_day_time_counts(path: &Path, counts: &[YearDayTimeCount]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for count in counts {
        writer.serialize(count)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::ItemPair;
    use tempfile::TempDir;

    fn sample_row() -> TransactionRow {
        TransactionRow {
            order_id: Some("o1".to_string()),
            location_id: Some("L1".to_string()),
            created_at: Some("2024-09-01T04:30:00Z".to_string()),
            updated_at: None,
            state: Some("COMPLETED".to_string()),
            item_id: Some("cat-1".to_string()),
            item_name: Some("Latte".to_string()),
            variation_name: Some("Large".to_string()),
            quantity: Some(2),
            base_price: Some(4.75),
            total_money: 9.50,
        }
    }

    fn fallback_row() -> TransactionRow {
        TransactionRow {
            order_id: Some("o2".to_string()),
            location_id: Some("L1".to_string()),
            created_at: Some("2024-09-02T12:00:00Z".to_string()),
            updated_at: None,
            state: Some("COMPLETED".to_string()),
            item_id: None,
            item_name: None,
            variation_name: None,
            quantity: None,
            base_price: None,
            total_money: 5.00,
        }
    }

    #[test]
    fn test_rows_survive_write_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.csv");
        let rows = vec![sample_row(), fallback_row()];

        write_rows(&path, &rows).unwrap();
        let read_back = read_rows(&path).unwrap();

        assert_eq!(read_back, rows);
        // The null-item row keeps its empty item fields.
        assert!(read_back[1].item_name.is_none());
        assert!(read_back[1].quantity.is_none());
    }

    #[test]
    fn test_pairs_file_has_header_and_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pairs.csv");
        let pairs = vec![PairCount {
            pair: ItemPair::new("Muffin", "Latte"),
            count: 7,
        }];

        write_pairs(&path, &pairs).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("first_item,second_item,count"));
        assert_eq!(lines.next(), Some("Latte,Muffin,7"));
    }

    #[test]
    fn test_time_counts_written_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("by_time.csv");
        write_time_counts(
            &path,
            &[TimeCount {
                time: "00:30".to_string(),
                count: 3,
            }],
        )
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("time,count"));
        assert!(contents.contains("00:30,3"));
    }
}
