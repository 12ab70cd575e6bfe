//! Grid Member Protocol
//!
//! Endpoint paths and Data Transfer Objects spoken between a `GridClient` and a
//! member hosting the map. Values travel as JSON strings so the protocol does
//! not depend on the value type.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Route pattern for point reads: `/grid/maps/{map}/get/{key}`.
pub const ROUTE_GET: &str = "/grid/maps/:map/get/:key";
/// Route pattern for membership checks: `/grid/maps/{map}/contains/{key}`.
pub const ROUTE_CONTAINS: &str = "/grid/maps/:map/contains/:key";
/// Route pattern for batched writes: `/grid/maps/{map}/put_all`.
pub const ROUTE_PUT_ALL: &str = "/grid/maps/:map/put_all";

pub fn get_path(map: &str, key: &str) -> String {
    format!(
        "/grid/maps/{}/get/{}",
        urlencoding::encode(map),
        urlencoding::encode(key)
    )
}

pub fn contains_path(map: &str, key: &str) -> String {
    format!(
        "/grid/maps/{}/contains/{}",
        urlencoding::encode(map),
        urlencoding::encode(key)
    )
}

pub fn put_all_path(map: &str) -> String {
    format!("/grid/maps/{}/put_all", urlencoding::encode(map))
}

// --- Data Transfer Objects ---

/// Response to a point read.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetResponse {
    /// The value serialized as JSON; `None` when the map has no such key.
    pub value_json: Option<String>,
}

/// Response to a membership check.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContainsResponse {
    pub present: bool,
}

/// A single key-value pair in a batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyValueJson {
    pub key: String,
    pub value_json: String,
}

/// A batch of writes.
///
/// `op_id` lets the member drop a batch the client re-sent after a timeout.
#[derive(Debug, Serialize, Deserialize)]
pub struct PutAllRequest {
    pub op_id: String,
    pub entries: Vec<KeyValueJson>,
}

/// Acknowledgment for a batch write.
#[derive(Debug, Serialize, Deserialize)]
pub struct PutAllResponse {
    pub success: bool,
    /// Entries written by this request; zero for a replayed `op_id`.
    pub applied: usize,
}
