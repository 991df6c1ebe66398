//! The batch analysis pipeline
//!
//! Glue over the three stages: fetched orders (or a previously exported
//! transaction table) go through flattening, basket analysis, and temporal
//! grouping, producing one report value that the CLI writes out as CSV tables.

use crate::basket::{anchor_pairs_first, count_pairs, split_by_anchor, PairCount};
use crate::error::Result;
use crate::export;
use crate::flatten::{to_flat_rows, to_transaction_lists, TransactionRow};
use crate::square::models::Order;
use crate::temporal::{analyze_time_of_day, TimeOfDayReport};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Everything the analysis produces for one batch of rows
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// All pairs, anchor-first relabeled, sorted by descending count
    pub pairs: Vec<PairCount>,
    /// The pairs containing the anchor item, in the same order
    pub anchor_pairs: Vec<PairCount>,
    /// The pairs not containing the anchor item, in the same order
    pub other_pairs: Vec<PairCount>,
    pub time_of_day: TimeOfDayReport,
}

/// Flatten fetched orders and analyze them in one step
pub fn analyze_orders(orders: &[Order], anchor: &str, tz: Tz) -> (Vec<TransactionRow>, AnalysisReport) {
    let rows = to_flat_rows(orders);
    let transactions = to_transaction_lists(orders);
    let report = analyze(&rows, &transactions, anchor, tz);
    (rows, report)
}

/// Analyze a transaction table read back from disk
///
/// Baskets are reassembled by grouping rows on order id; rows without an item
/// name (the itemless-order fallback rows) stay in the table for temporal
/// analysis but contribute nothing to pairing.
pub fn analyze_rows(rows: &[TransactionRow], anchor: &str, tz: Tz) -> AnalysisReport {
    let transactions = transactions_from_rows(rows);
    analyze(rows, &transactions, anchor, tz)
}

fn analyze(
    rows: &[TransactionRow],
    transactions: &[Vec<String>],
    anchor: &str,
    tz: Tz,
) -> AnalysisReport {
    let pairs = anchor_pairs_first(count_pairs(transactions), anchor);
    let (anchor_pairs, other_pairs) = split_by_anchor(&pairs, anchor);
    let time_of_day = analyze_time_of_day(rows, tz);

    info!(
        orders = transactions.len(),
        pairs = pairs.len(),
        "Basket analysis finished"
    );

    AnalysisReport {
        pairs,
        anchor_pairs,
        other_pairs,
        time_of_day,
    }
}

/// Group a flat table back into per-order item name lists
pub fn transactions_from_rows(rows: &[TransactionRow]) -> Vec<Vec<String>> {
    let mut by_order: HashMap<&str, Vec<String>> = HashMap::new();
    let mut order_ids: Vec<&str> = Vec::new();

    for row in rows {
        let (Some(order_id), Some(item_name)) = (row.order_id.as_deref(), row.item_name.clone())
        else {
            continue;
        };
        let items = by_order.entry(order_id).or_insert_with(|| {
            order_ids.push(order_id);
            Vec::new()
        });
        items.push(item_name);
    }

    order_ids
        .into_iter()
        .filter_map(|id| by_order.remove(id))
        .collect()
}

/// Write the report's tables next to each other under `dir`
pub fn write_report(dir: &Path, report: &AnalysisReport) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    export::write_pairs(&dir.join("pairs.csv"), &report.pairs)?;
    export::write_pairs(&dir.join("anchor_pairs.csv"), &report.anchor_pairs)?;
    export::write_pairs(&dir.join("other_pairs.csv"), &report.other_pairs)?;
    export::write_time_counts(&dir.join("purchases_by_time.csv"), &report.time_of_day.by_time)?;
    export::write_day_time_counts(
        &dir.join("purchases_by_day_time.csv"),
        &report.time_of_day.by_day_time,
    )?;
    export::write_year_day_time_counts(
        &dir.join("purchases_by_year_day_time.csv"),
        &report.time_of_day.by_year_day_time,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    fn row(order_id: &str, item_name: Option<&str>) -> TransactionRow {
        TransactionRow {
            order_id: Some(order_id.to_string()),
            location_id: Some("L1".to_string()),
            created_at: Some("2024-09-01T04:30:00Z".to_string()),
            updated_at: None,
            state: Some("COMPLETED".to_string()),
            item_id: None,
            item_name: item_name.map(|s| s.to_string()),
            variation_name: None,
            quantity: item_name.map(|_| 1),
            base_price: item_name.map(|_| 4.75),
            total_money: 4.75,
        }
    }

    #[test]
    fn test_transactions_regroup_by_order() {
        let rows = vec![
            row("o1", Some("Latte")),
            row("o1", Some("Muffin")),
            row("o2", None),
            row("o3", Some("Scone")),
        ];
        let transactions = transactions_from_rows(&rows);

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0], vec!["Latte", "Muffin"]);
        assert_eq!(transactions[1], vec!["Scone"]);
    }

    #[test]
    fn test_analyze_rows_counts_pairs_and_slots() {
        let rows = vec![
            row("o1", Some("Latte")),
            row("o1", Some("Muffin")),
            row("o2", Some("Latte")),
            row("o2", Some("Muffin")),
            row("o3", Some("Muffin")),
            row("o3", Some("Scone")),
        ];
        let report = analyze_rows(&rows, "Latte", New_York);

        assert_eq!(report.pairs.len(), 2);
        assert_eq!(report.pairs[0].count, 2);
        assert_eq!(report.pairs[0].pair.first, "Latte");

        assert_eq!(report.anchor_pairs.len(), 1);
        assert_eq!(report.other_pairs.len(), 1);

        assert_eq!(report.time_of_day.by_time.len(), 1);
        assert_eq!(report.time_of_day.by_time[0].count, 6);
    }
}
