use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Serialize, de::DeserializeOwned};
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use super::memory::GridMap;
use super::protocol::{
    ContainsResponse, GetResponse, PutAllRequest, PutAllResponse, ROUTE_CONTAINS, ROUTE_GET,
    ROUTE_PUT_ALL,
};

/// Routes serving the member protocol for `map`.
pub fn member_router<K, V>(map: Arc<GridMap<K, V>>) -> Router
where
    K: ToString + FromStr + Clone + Hash + Eq + Send + Sync + 'static,
    <K as FromStr>::Err: std::fmt::Display,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    Router::new()
        .route(ROUTE_GET, get(handle_get::<K, V>))
        .route(ROUTE_CONTAINS, get(handle_contains::<K, V>))
        .route(ROUTE_PUT_ALL, post(handle_put_all::<K, V>))
        .layer(Extension(map))
}

pub async fn handle_get<K, V>(
    Extension(map): Extension<Arc<GridMap<K, V>>>,
    Path((map_name, key_str)): Path<(String, String)>,
) -> (StatusCode, Json<GetResponse>)
where
    K: ToString + FromStr + Clone + Hash + Eq + Send + Sync + 'static,
    <K as FromStr>::Err: std::fmt::Display,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    if map_name != map.name() {
        return (StatusCode::NOT_FOUND, Json(GetResponse { value_json: None }));
    }

    let key: K = match key_str.parse() {
        Ok(k) => k,
        Err(e) => {
            tracing::error!("Failed to parse key: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(GetResponse { value_json: None }),
            );
        }
    };

    match map.get(&key) {
        Some(value) => match serde_json::to_string(&value) {
            Ok(value_json) => (
                StatusCode::OK,
                Json(GetResponse {
                    value_json: Some(value_json),
                }),
            ),
            Err(e) => {
                tracing::error!("Failed to serialize value: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(GetResponse { value_json: None }),
                )
            }
        },
        // 404 is kept for an unknown map, so a missing key is a plain 200.
        None => (StatusCode::OK, Json(GetResponse { value_json: None })),
    }
}

pub async fn handle_contains<K, V>(
    Extension(map): Extension<Arc<GridMap<K, V>>>,
    Path((map_name, key_str)): Path<(String, String)>,
) -> (StatusCode, Json<ContainsResponse>)
where
    K: ToString + FromStr + Clone + Hash + Eq + Send + Sync + 'static,
    <K as FromStr>::Err: std::fmt::Display,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    if map_name != map.name() {
        return (
            StatusCode::NOT_FOUND,
            Json(ContainsResponse { present: false }),
        );
    }

    match key_str.parse::<K>() {
        Ok(key) => (
            StatusCode::OK,
            Json(ContainsResponse {
                present: map.contains_key(&key),
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to parse key: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ContainsResponse { present: false }),
            )
        }
    }
}

pub async fn handle_put_all<K, V>(
    Extension(map): Extension<Arc<GridMap<K, V>>>,
    Path(map_name): Path<String>,
    Json(req): Json<PutAllRequest>,
) -> (StatusCode, Json<PutAllResponse>)
where
    K: ToString + FromStr + Clone + Hash + Eq + Send + Sync + 'static,
    <K as FromStr>::Err: std::fmt::Display,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let rejected = |status: StatusCode| {
        (
            status,
            Json(PutAllResponse {
                success: false,
                applied: 0,
            }),
        )
    };

    if map_name != map.name() {
        return rejected(StatusCode::NOT_FOUND);
    }

    // Decode the whole batch first so a bad entry never leaves a partial write.
    let mut entries = Vec::with_capacity(req.entries.len());
    for item in req.entries {
        let key: K = match item.key.parse() {
            Ok(k) => k,
            Err(e) => {
                tracing::error!("Failed to parse key: {}", e);
                return rejected(StatusCode::BAD_REQUEST);
            }
        };
        let value: V = match serde_json::from_str(&item.value_json) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Failed to deserialize value: {}", e);
                return rejected(StatusCode::BAD_REQUEST);
            }
        };
        entries.push((key, value));
    }

    let applied = map.put_all_with_op(&req.op_id, entries).unwrap_or(0);
    (
        StatusCode::OK,
        Json(PutAllResponse {
            success: true,
            applied,
        }),
    )
}
