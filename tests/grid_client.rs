//! Grid client mode against a real member listening on a local socket.

use axum::Router;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{get, post};
use nosql_lab::context::{AppContext, StoreBinding};
use nosql_lab::dataset::{StudentRecord, generate};
use nosql_lab::error::LabError;
use nosql_lab::grid::handlers::handle_contains;
use nosql_lab::grid::protocol::{ROUTE_CONTAINS, ROUTE_PUT_ALL};
use nosql_lab::grid::{GridClient, GridMap, Partitioner, member_router};
use nosql_lab::router::{GRID_PREFIX, create_app};
use nosql_lab::store::grid::MAP_NAME;
use nosql_lab::store::{GridStore, SeedOutcome, StudentStore};
use std::net::SocketAddr;
use std::sync::Arc;

const BASE: u64 = 2025000001;

fn new_map(name: &str) -> Arc<GridMap<String, StudentRecord>> {
    Arc::new(GridMap::new(name, Arc::new(Partitioner::new())))
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Serves an embedded member the way the binary does and returns its address.
async fn spawn_member() -> (SocketAddr, Arc<GridMap<String, StudentRecord>>) {
    let map = new_map(MAP_NAME);
    let ctx = AppContext::new(vec![StoreBinding {
        prefix: GRID_PREFIX.to_string(),
        store: Arc::new(GridStore::embedded(map.clone())),
    }])
    .with_grid_member(map.clone());

    (serve(create_app(ctx)).await, map)
}

#[tokio::test]
async fn test_client_seeds_remote_member_once() {
    let (addr, map) = spawn_member().await;
    let store = GridStore::client(&addr.to_string());
    let records = generate(5_000, BASE, 42).unwrap();

    let first = store.seed_if_empty(&records).await.unwrap();
    let second = store.seed_if_empty(&records).await.unwrap();

    assert_eq!(
        first,
        SeedOutcome::Seeded {
            records: 5_000,
            batches: 3
        }
    );
    assert_eq!(second, SeedOutcome::AlreadySeeded);
    assert_eq!(map.entry_count(), 5_000);
    assert_eq!(map.mutation_count(), 3);
}

#[tokio::test]
async fn test_client_round_trips_records() {
    let (addr, _map) = spawn_member().await;
    let store = GridStore::client(&format!("http://{}/", addr));
    let records = generate(300, BASE, 42).unwrap();
    store.seed_if_empty(&records).await.unwrap();

    for record in records.iter().step_by(37) {
        let found = store.get_by_id(&record.student_no).await.unwrap();
        assert_eq!(found.as_ref(), Some(record));
    }
    assert!(store.get_by_id("9999999999").await.unwrap().is_none());
}

#[tokio::test]
async fn test_member_seeded_by_client_serves_lookup_route() {
    let (addr, _map) = spawn_member().await;
    let records = generate(10, BASE, 42).unwrap();
    GridStore::client(&addr.to_string())
        .seed_if_empty(&records)
        .await
        .unwrap();

    let response = reqwest::get(format!("http://{}/nosql-lab-hz/student_no={}", addr, BASE))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    let body: StudentRecord = response.json().await.unwrap();
    assert_eq!(body, records[0]);
}

#[tokio::test]
async fn test_client_reports_unreachable_member_as_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = GridStore::client(&addr.to_string());
    let records = generate(1, BASE, 42).unwrap();

    assert!(store.get_by_id("2025000001").await.is_err());
    assert!(store.seed_if_empty(&records).await.is_err());
}

#[tokio::test]
async fn test_client_lookup_against_process_without_member_routes_is_error() {
    // A lab instance in client mode answers /grid/... with its JSON 404.
    let addr = serve(create_app(AppContext::new(vec![]))).await;
    let store = GridStore::client(&addr.to_string());

    let result = store.get_by_id("2025000001").await;

    assert!(
        matches!(result, Err(LabError::Store { backend: "grid", .. })),
        "expected a store error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_client_against_member_of_other_map_is_error() {
    let other = new_map("courses");
    other.put_all(vec![(
        "2025000001".to_string(),
        StudentRecord::new("2025000001", "Ahmet Yılmaz", "Physics"),
    )]);
    let addr = serve(member_router(other.clone())).await;
    let store = GridStore::client(&addr.to_string());
    let records = generate(10, BASE, 42).unwrap();

    assert!(matches!(
        store.get_by_id("2025000001").await,
        Err(LabError::Store { .. })
    ));
    assert!(matches!(
        store.seed_if_empty(&records).await,
        Err(LabError::Seed { .. })
    ));
    assert_eq!(other.mutation_count(), 1);
}

#[tokio::test]
async fn test_rejected_batch_fails_the_seed() {
    // Reads are served normally, every batch write is refused.
    let map = new_map(MAP_NAME);
    let app = Router::new()
        .route(ROUTE_CONTAINS, get(handle_contains::<String, StudentRecord>))
        .route(ROUTE_PUT_ALL, post(|| async { StatusCode::BAD_REQUEST }))
        .layer(Extension(map.clone()));
    let addr = serve(app).await;
    let store = GridStore::client(&addr.to_string()).with_batch_size(100);
    let records = generate(250, BASE, 42).unwrap();

    let result = store.seed_if_empty(&records).await;

    assert!(
        matches!(result, Err(LabError::Seed { backend: "grid", .. })),
        "expected a seed error, got {:?}",
        result
    );
    assert_eq!(map.entry_count(), 0);
}

#[tokio::test]
async fn test_close_releases_client() {
    let (addr, _map) = spawn_member().await;
    let store = GridStore::client(&addr.to_string());

    store.close().await.unwrap();
    store.close().await.unwrap();

    assert!(store.is_closed().await);
    assert!(matches!(
        store.get_by_id("2025000001").await,
        Err(LabError::Store { .. })
    ));
}

#[test]
fn test_client_normalises_address() {
    assert_eq!(
        GridClient::new("localhost:5701", MAP_NAME).base_url(),
        "http://localhost:5701"
    );
    assert_eq!(
        GridClient::new(" http://grid:5701/ ", MAP_NAME).base_url(),
        "http://grid:5701"
    );
}
