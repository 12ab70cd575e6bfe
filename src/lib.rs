//! NoSQL Lab Library
//!
//! Seeds one deterministic student dataset into three storage technologies and
//! serves the same point lookup against each of them over HTTP.
//!
//! ## Architecture Modules
//! - **`dataset`**: The `StudentRecord` entity and the seeded generator.
//! - **`store`**: The `StudentStore` trait (seed once, get by id, close) and its
//!   Redis, grid and MongoDB adapters.
//! - **`grid`**: A partitioned in-memory map with an HTTP member protocol and
//!   client, used by the grid adapter in embedded or client mode.
//! - **`router`**: Axum app mapping route prefixes to stores and rendering JSON.
//! - **`context`**: The `AppContext` handed to the router and to shutdown.
//! - **`config`**, **`telemetry`**, **`error`**: Environment settings, logging
//!   setup and the error taxonomy.

pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod router;
pub mod store;
pub mod telemetry;
