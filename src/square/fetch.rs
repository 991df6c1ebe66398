//! Paginated order retrieval
//!
//! A single linear pass over the search-orders endpoint: each page's cursor
//! feeds the next request, so there is nothing to parallelize. A failed page
//! ends the pass with whatever was already accumulated — callers must treat
//! the result as possibly incomplete. No retries and no backoff.

use crate::error::{Error, Result};
use crate::square::api::SquareApi;
use crate::square::models::{
    DateTimeFilter, Order, SearchOrdersFilter, SearchOrdersQuery, SearchOrdersRequest, TimeRange,
};
use tracing::{debug, error, info};

/// Maximum page size the orders search endpoint allows
pub const PAGE_LIMIT: u32 = 500;

fn build_request(
    location_id: &str,
    begin_time: Option<&str>,
    end_time: Option<&str>,
    cursor: Option<String>,
) -> SearchOrdersRequest {
    let query = match (begin_time, end_time) {
        (Some(start_at), Some(end_at)) => Some(SearchOrdersQuery {
            filter: SearchOrdersFilter {
                date_time_filter: DateTimeFilter {
                    created_at: TimeRange {
                        start_at: start_at.to_string(),
                        end_at: end_at.to_string(),
                    },
                },
            },
        }),
        _ => None,
    };

    SearchOrdersRequest {
        location_ids: vec![location_id.to_string()],
        limit: PAGE_LIMIT,
        query,
        cursor,
    }
}

/// Fetch every order for a location, optionally restricted to a created-at
/// range
///
/// Returns all orders the API handed back before the first failure. A non-2xx
/// page (or a dead connection) is logged and truncates the result instead of
/// surfacing as an error.
pub async fn fetch_all_orders(
    api: &dyn SquareApi,
    location_id: &str,
    begin_time: Option<&str>,
    end_time: Option<&str>,
) -> Result<Vec<Order>> {
    if location_id.is_empty() {
        return Err(Error::Validation("location id must not be empty".to_string()));
    }
    if begin_time.is_some() != end_time.is_some() {
        return Err(Error::Validation(
            "begin time and end time must be given together".to_string(),
        ));
    }

    let mut orders: Vec<Order> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 0u32;

    loop {
        let request = build_request(location_id, begin_time, end_time, cursor.take());
        page += 1;

        match api.search_orders(&request).await {
            Ok(response) => {
                debug!(page, count = response.orders.len(), "Retrieved orders page");
                orders.extend(response.orders);

                // An absent or empty cursor means the last page.
                cursor = response.cursor.filter(|c| !c.is_empty());
                if cursor.is_none() {
                    break;
                }
            }
            Err(e) => {
                error!("Error retrieving orders on page {page}: {e}");
                break;
            }
        }
    }

    info!(total = orders.len(), pages = page, "Order fetch finished");
    Ok(orders)
}

/// Walk from a payment id to the order it paid for
pub async fn order_for_payment(api: &dyn SquareApi, payment_id: &str) -> Result<Order> {
    let payment = api.retrieve_payment(payment_id).await?;
    let order_id = payment
        .order_id
        .ok_or_else(|| Error::NotFound(format!("payment {payment_id} has no order")))?;
    api.retrieve_order(&order_id).await
}
