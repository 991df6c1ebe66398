//! Wire types for the Square Connect v2 API
//!
//! Only the fields the pipeline consumes are modeled; everything else in the
//! JSON payloads is ignored during deserialization. An item's `name` is the
//! one field treated as mandatory — a record without it fails the page it
//! arrived on.

use serde::{Deserialize, Serialize};

/// A monetary amount in minor units (cents)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

impl Money {
    /// Minor units, with the absent case defaulting to zero
    pub fn amount_or_zero(&self) -> i64 {
        self.amount.unwrap_or(0)
    }

    /// Convert minor units to decimal major units (cents to dollars)
    pub fn to_major_units(&self) -> f64 {
        self.amount_or_zero() as f64 / 100.0
    }
}

/// Convert an optional money field to major units, treating absence as zero
pub fn optional_money_major_units(money: Option<&Money>) -> f64 {
    money.map(Money::to_major_units).unwrap_or(0.0)
}

/// A single purchased catalog entry within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub catalog_object_id: Option<String>,
    pub name: String,
    pub variation_name: Option<String>,
    /// Quantity as sent on the wire: a decimal string like `"2"`
    pub quantity: Option<String>,
    pub base_price_money: Option<Money>,
    pub total_money: Option<Money>,
}

impl LineItem {
    /// Integer quantity, defaulting to 1 when missing or unparsable
    pub fn parsed_quantity(&self) -> u32 {
        self.quantity
            .as_deref()
            .and_then(|q| q.parse::<u32>().ok())
            .unwrap_or(1)
    }
}

/// A customer transaction record as returned by the orders API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<String>,
    pub location_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub total_money: Option<Money>,
}

/// Request body for `POST /v2/orders/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOrdersRequest {
    pub location_ids: Vec<String>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<SearchOrdersQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOrdersQuery {
    pub filter: SearchOrdersFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOrdersFilter {
    pub date_time_filter: DateTimeFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateTimeFilter {
    pub created_at: TimeRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_at: String,
    pub end_at: String,
}

/// Response body for `POST /v2/orders/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
    pub cursor: Option<String>,
}

/// A payment record, used to walk from a payment back to its order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: Option<String>,
    pub amount_money: Option<Money>,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPaymentsResponse {
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievePaymentResponse {
    pub payment: Payment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveOrderResponse {
    pub order: Order,
}

/// A customer profile, listed for quick inspection only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl Customer {
    /// Display name assembled from the optional name parts
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.given_name.as_deref().unwrap_or(""),
            self.family_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCustomersResponse {
    #[serde(default)]
    pub customers: Vec<Customer>,
    pub cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_defaults_to_zero() {
        let money = Money::default();
        assert_eq!(money.amount_or_zero(), 0);
        assert_eq!(money.to_major_units(), 0.0);
        assert_eq!(optional_money_major_units(None), 0.0);
    }

    #[test]
    fn test_money_minor_to_major_units() {
        let money = Money {
            amount: Some(475),
            currency: Some("USD".to_string()),
        };
        assert_eq!(money.to_major_units(), 4.75);
    }

    #[test]
    fn test_quantity_parses_with_fallback() {
        let mut item = LineItem {
            catalog_object_id: None,
            name: "Latte".to_string(),
            variation_name: None,
            quantity: Some("3".to_string()),
            base_price_money: None,
            total_money: None,
        };
        assert_eq!(item.parsed_quantity(), 3);

        item.quantity = None;
        assert_eq!(item.parsed_quantity(), 1);

        item.quantity = Some("not-a-number".to_string());
        assert_eq!(item.parsed_quantity(), 1);
    }

    #[test]
    fn test_order_deserializes_without_line_items() {
        let order: Order = serde_json::from_str(
            r#"{"id":"o1","state":"COMPLETED","total_money":{"amount":500,"currency":"USD"}}"#,
        )
        .unwrap();
        assert!(order.line_items.is_empty());
        assert_eq!(order.total_money.unwrap().amount_or_zero(), 500);
    }

    #[test]
    fn test_line_item_requires_name() {
        let result: std::result::Result<LineItem, _> =
            serde_json::from_str(r#"{"quantity":"2"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_request_omits_absent_fields() {
        let request = SearchOrdersRequest {
            location_ids: vec!["L1".to_string()],
            limit: 500,
            query: None,
            cursor: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("cursor"));
        assert!(!json.contains("query"));
    }

    #[test]
    fn test_customer_display_name() {
        let customer = Customer {
            id: "c1".to_string(),
            given_name: Some("Ada".to_string()),
            family_name: None,
        };
        assert_eq!(customer.display_name(), "Ada");
    }
}
