//! Square Connect v2 API layer
//!
//! Wire models, a trait seam over the endpoints the pipeline uses, the real
//! reqwest-backed client, and the paginated order fetch built on top of it.

pub mod api;
pub mod client;
pub mod fetch;
pub mod models;

pub use api::{MockSquareApi, SquareApi};
pub use client::SquareClient;
pub use fetch::{fetch_all_orders, order_for_payment, PAGE_LIMIT};
pub use models::{LineItem, Money, Order, SearchOrdersRequest, SearchOrdersResponse};
