//! # Pourover
//!
//! A batch tool that pulls point-of-sale orders from the Square Connect v2
//! API for one location, flattens them into a per-line-item transaction table,
//! and runs basket analysis (which items sell together) plus time-of-day
//! statistics in a configurable civil timezone.
//!
//! ## Usage
//!
//! ```bash
//! pourover pull --location-id L123 --begin 2024-09-01T00:00:00Z --end 2024-09-30T23:59:59Z
//! pourover analyze --input orders.csv
//! ```
//!
//! ## Modules
//!
//! - `config` - Environment-driven configuration with CLI overrides
//! - `square` - Wire models, the API trait seam, the reqwest client, and paginated order fetching
//! - `flatten` - Nested orders to flat transaction rows and per-order item lists
//! - `basket` - Item-pair co-occurrence counting, anchor canonicalization and partitioning
//! - `temporal` - Timezone-normalized time-of-day / day-of-week / year groupings
//! - `export` - CSV persistence for every table the pipeline produces
//! - `pipeline` - Orchestration of the stages into a single analysis report

pub mod basket;
pub mod config;
pub mod error;
pub mod export;
pub mod flatten;
pub mod pipeline;
pub mod square;
pub mod temporal;
