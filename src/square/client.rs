//! HTTP client for the Square Connect v2 API

use crate::error::{Error, Result};
use crate::square::api::SquareApi;
use crate::square::models::{
    ListCustomersResponse, ListPaymentsResponse, Order, Payment, RetrieveOrderResponse,
    RetrievePaymentResponse, SearchOrdersRequest, SearchOrdersResponse,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Square API client authenticated with a bearer token
pub struct SquareClient {
    client: Client,
    api_base: String,
    access_token: String,
}

impl SquareClient {
    /// Create a new client against the given API origin
    pub fn new(api_base: &str, access_token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Read the body as `T` on success, or capture status and body text on a
    /// non-2xx response
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl SquareApi for SquareClient {
    async fn search_orders(&self, request: &SearchOrdersRequest) -> Result<SearchOrdersResponse> {
        let response = self
            .client
            .post(self.url("/v2/orders/search"))
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_payments(&self) -> Result<ListPaymentsResponse> {
        self.get("/v2/payments").await
    }

    async fn list_customers(&self) -> Result<ListCustomersResponse> {
        self.get("/v2/customers").await
    }

    async fn retrieve_payment(&self, payment_id: &str) -> Result<Payment> {
        let response: RetrievePaymentResponse =
            self.get(&format!("/v2/payments/{payment_id}")).await?;
        Ok(response.payment)
    }

    async fn retrieve_order(&self, order_id: &str) -> Result<Order> {
        let response: RetrieveOrderResponse = self.get(&format!("/v2/orders/{order_id}")).await?;
        Ok(response.order)
    }
}
