//! Order flattening
//!
//! Turns nested order/line-item records into two shapes: a flat per-line-item
//! transaction table for CSV export and temporal analysis, and per-order item
//! name lists (expanded by quantity) for basket analysis.

use crate::square::models::{optional_money_major_units, Order};
use serde::{Deserialize, Serialize};

/// One row of the flattened transaction table
///
/// Order-level fields are denormalized onto every row. An order with no line
/// items still yields exactly one row, with the item-level fields empty and
/// the order's own total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub order_id: Option<String>,
    pub location_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub state: Option<String>,
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub variation_name: Option<String>,
    pub quantity: Option<u32>,
    /// Unit base price in major units
    pub base_price: Option<f64>,
    /// Line total (or order total for itemless orders) in major units
    pub total_money: f64,
}

/// Flatten orders into one row per line item
pub fn to_flat_rows(orders: &[Order]) -> Vec<TransactionRow> {
    let mut rows = Vec::new();
    for order in orders {
        if order.line_items.is_empty() {
            rows.push(TransactionRow {
                order_id: order.id.clone(),
                location_id: order.location_id.clone(),
                created_at: order.created_at.clone(),
                updated_at: order.updated_at.clone(),
                state: order.state.clone(),
                item_id: None,
                item_name: None,
                variation_name: None,
                quantity: None,
                base_price: None,
                total_money: optional_money_major_units(order.total_money.as_ref()),
            });
            continue;
        }

        for item in &order.line_items {
            rows.push(TransactionRow {
                order_id: order.id.clone(),
                location_id: order.location_id.clone(),
                created_at: order.created_at.clone(),
                updated_at: order.updated_at.clone(),
                state: order.state.clone(),
                item_id: item.catalog_object_id.clone(),
                item_name: Some(item.name.clone()),
                variation_name: item.variation_name.clone(),
                quantity: Some(item.parsed_quantity()),
                base_price: Some(optional_money_major_units(item.base_price_money.as_ref())),
                total_money: optional_money_major_units(item.total_money.as_ref()),
            });
        }
    }
    rows
}

/// Per-order item name lists for basket analysis
///
/// Each line item's name is repeated `quantity` times. Orders whose expansion
/// comes out empty contribute nothing.
pub fn to_transaction_lists(orders: &[Order]) -> Vec<Vec<String>> {
    orders
        .iter()
        .filter_map(|order| {
            let items: Vec<String> = order
                .line_items
                .iter()
                .flat_map(|item| {
                    std::iter::repeat(item.name.clone()).take(item.parsed_quantity() as usize)
                })
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(items)
            }
        })
        .collect()
}
