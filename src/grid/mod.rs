//! In-Memory Data Grid Module
//!
//! A small partitioned key-value grid used as the "grid-store" backend.
//!
//! ## Core Concepts
//! - **Partitioning**: Keys are hashed into a fixed number of partitions (271).
//! - **Named maps**: Each `GridMap` carries a name; members only answer for maps they host.
//! - **Embedded member**: The map lives in this process and its HTTP endpoints are
//!   mounted on the main listener so other processes can use it.
//! - **Client**: `GridClient` talks to a running member over HTTP, with retries.
//!
//! ## Submodules
//! - **`partitioner`**: Key to partition hashing.
//! - **`memory`**: The partitioned concurrent map (`GridMap`).
//! - **`protocol`**: Endpoint paths and DTOs of the member protocol.
//! - **`handlers`**: Axum handlers serving the member protocol.
//! - **`client`**: HTTP client for the member protocol.

pub mod client;
pub mod handlers;
pub mod memory;
pub mod partitioner;
pub mod protocol;

pub use client::GridClient;
pub use handlers::member_router;
pub use memory::GridMap;
pub use partitioner::Partitioner;
