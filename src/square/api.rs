//! Square API abstraction layer
//!
//! Provides a trait-based seam over the handful of Square endpoints the tool
//! touches, so the pipeline can be exercised in tests without network access.

use crate::error::{Error, Result};
use crate::square::models::{
    Customer, ListCustomersResponse, ListPaymentsResponse, Order, Payment, SearchOrdersRequest,
    SearchOrdersResponse,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Trait for the Square endpoints used by the pipeline
#[async_trait]
pub trait SquareApi: Send + Sync {
    /// `POST /v2/orders/search` — one page of orders for a location
    async fn search_orders(&self, request: &SearchOrdersRequest) -> Result<SearchOrdersResponse>;

    /// `GET /v2/payments` — most recent payments
    async fn list_payments(&self) -> Result<ListPaymentsResponse>;

    /// `GET /v2/customers` — customer profiles
    async fn list_customers(&self) -> Result<ListCustomersResponse>;

    /// `GET /v2/payments/{id}` — a single payment
    async fn retrieve_payment(&self, payment_id: &str) -> Result<Payment>;

    /// `GET /v2/orders/{id}` — a single order
    async fn retrieve_order(&self, order_id: &str) -> Result<Order>;
}

/// Mock implementation with scripted responses for testing
pub struct MockSquareApi {
    /// Responses handed out by `search_orders`, in FIFO order
    search_responses: Arc<Mutex<VecDeque<Result<SearchOrdersResponse>>>>,
    /// Request bodies seen by `search_orders`, for verification
    search_requests: Arc<Mutex<Vec<SearchOrdersRequest>>>,
    payments: Arc<Mutex<Vec<Payment>>>,
    customers: Arc<Mutex<Vec<Customer>>>,
    orders_by_id: Arc<Mutex<HashMap<String, Order>>>,
}

impl MockSquareApi {
    pub fn new() -> Self {
        Self {
            search_responses: Arc::new(Mutex::new(VecDeque::new())),
            search_requests: Arc::new(Mutex::new(Vec::new())),
            payments: Arc::new(Mutex::new(Vec::new())),
            customers: Arc::new(Mutex::new(Vec::new())),
            orders_by_id: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Queue a successful search page
    pub async fn add_search_page(&self, orders: Vec<Order>, cursor: Option<String>) {
        self.search_responses
            .lock()
            .await
            .push_back(Ok(SearchOrdersResponse { orders, cursor }));
    }

    /// Queue a failed search page with an HTTP status and body
    pub async fn add_search_failure(&self, status: u16, body: &str) {
        self.search_responses.lock().await.push_back(Err(Error::Api {
            status,
            body: body.to_string(),
        }));
    }

    /// Register an order for `retrieve_order`
    pub async fn add_order(&self, order: Order) {
        if let Some(id) = order.id.clone() {
            self.orders_by_id.lock().await.insert(id, order);
        }
    }

    pub async fn add_payment(&self, payment: Payment) {
        self.payments.lock().await.push(payment);
    }

    pub async fn add_customer(&self, customer: Customer) {
        self.customers.lock().await.push(customer);
    }

    /// Request bodies `search_orders` was called with, in call order
    pub async fn seen_search_requests(&self) -> Vec<SearchOrdersRequest> {
        self.search_requests.lock().await.clone()
    }
}

impl Default for MockSquareApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SquareApi for MockSquareApi {
    async fn search_orders(&self, request: &SearchOrdersRequest) -> Result<SearchOrdersResponse> {
        self.search_requests.lock().await.push(request.clone());
        self.search_responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(SearchOrdersResponse::default()))
    }

    async fn list_payments(&self) -> Result<ListPaymentsResponse> {
        Ok(ListPaymentsResponse {
            payments: self.payments.lock().await.clone(),
            cursor: None,
        })
    }

    async fn list_customers(&self) -> Result<ListCustomersResponse> {
        Ok(ListCustomersResponse {
            customers: self.customers.lock().await.clone(),
            cursor: None,
        })
    }

    async fn retrieve_payment(&self, payment_id: &str) -> Result<Payment> {
        self.payments
            .lock()
            .await
            .iter()
            .find(|p| p.id == payment_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("payment {payment_id}")))
    }

    async fn retrieve_order(&self, order_id: &str) -> Result<Order> {
        self.orders_by_id
            .lock()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("order {order_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_pages_in_order() {
        let mock = MockSquareApi::new();
        mock.add_search_page(vec![], Some("next".to_string())).await;
        mock.add_search_failure(500, "boom").await;

        let request = SearchOrdersRequest {
            location_ids: vec!["L1".to_string()],
            limit: 500,
            query: None,
            cursor: None,
        };

        let first = mock.search_orders(&request).await.unwrap();
        assert_eq!(first.cursor.as_deref(), Some("next"));

        let second = mock.search_orders(&request).await;
        assert!(matches!(second, Err(Error::Api { status: 500, .. })));

        assert_eq!(mock.seen_search_requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_retrieve_order_not_found() {
        let mock = MockSquareApi::new();
        let result = mock.retrieve_order("missing").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
