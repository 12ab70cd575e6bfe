//! Store Module Tests
//!
//! Exercises the seeding protocol and lookups through the `StudentStore` trait,
//! using the embedded grid so no external service is needed.
//!
//! *Note: Redis and MongoDB round-trips live in `tests/live_backends.rs` and skip
//! when the services are not reachable.*

#[cfg(test)]
mod tests {
    use crate::dataset::{StudentRecord, generate};
    use crate::error::LabError;
    use crate::grid::{GridMap, Partitioner};
    use crate::store::cache::cache_key;
    use crate::store::document::id_filter;
    use crate::store::grid::MAP_NAME;
    use crate::store::{GridStore, SeedOutcome, StudentStore, batch_count};
    use std::sync::Arc;

    const BASE: u64 = 2025000001;

    fn embedded_map() -> Arc<GridMap<String, StudentRecord>> {
        Arc::new(GridMap::new(MAP_NAME, Arc::new(Partitioner::new())))
    }

    // ============================================================
    // SEEDING
    // ============================================================

    #[tokio::test]
    async fn test_seed_writes_all_records_in_batches() {
        let map = embedded_map();
        let store = GridStore::embedded(map.clone());
        let records = generate(10_000, BASE, 42).unwrap();

        let outcome = store.seed_if_empty(&records).await.unwrap();

        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                records: 10_000,
                batches: 5
            }
        );
        assert_eq!(map.entry_count(), 10_000);
        assert_eq!(map.mutation_count(), 5);
    }

    #[tokio::test]
    async fn test_seed_twice_performs_no_second_write() {
        let map = embedded_map();
        let store = GridStore::embedded(map.clone());
        let records = generate(3_000, BASE, 42).unwrap();

        store.seed_if_empty(&records).await.unwrap();
        let mutations_after_first = map.mutation_count();
        let entries_after_first = map.entry_count();

        let second = store.seed_if_empty(&records).await.unwrap();

        assert_eq!(second, SeedOutcome::AlreadySeeded);
        assert_eq!(map.mutation_count(), mutations_after_first);
        assert_eq!(map.entry_count(), entries_after_first);
        for record in &records {
            assert_eq!(store.get_by_id(&record.student_no).await.unwrap().as_ref(), Some(record));
        }
    }

    #[tokio::test]
    async fn test_seed_is_skipped_for_a_restarted_adapter() {
        // A second adapter over the same map behaves like a process restart.
        let map = embedded_map();
        let records = generate(100, BASE, 42).unwrap();

        GridStore::embedded(map.clone())
            .seed_if_empty(&records)
            .await
            .unwrap();
        let outcome = GridStore::embedded(map.clone())
            .seed_if_empty(&records)
            .await
            .unwrap();

        assert_eq!(outcome, SeedOutcome::AlreadySeeded);
        assert_eq!(map.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_seed_honours_custom_batch_size() {
        let map = embedded_map();
        let store = GridStore::embedded(map.clone()).with_batch_size(3);
        let records = generate(10, BASE, 42).unwrap();

        let outcome = store.seed_if_empty(&records).await.unwrap();

        assert_eq!(
            outcome,
            SeedOutcome::Seeded {
                records: 10,
                batches: 4
            }
        );
        assert_eq!(map.mutation_count(), 4);
    }

    #[tokio::test]
    async fn test_seed_rejects_empty_dataset() {
        let store = GridStore::embedded(embedded_map());

        let result = store.seed_if_empty(&[]).await;
        assert!(matches!(result, Err(LabError::InvalidArgument(_))));
    }

    #[test]
    fn test_batch_count_rounds_up() {
        assert_eq!(batch_count(10_000, 2000), 5);
        assert_eq!(batch_count(10_001, 2000), 6);
        assert_eq!(batch_count(1, 1000), 1);
    }

    // ============================================================
    // LOOKUPS
    // ============================================================

    #[tokio::test]
    async fn test_get_returns_seeded_record_for_every_id() {
        let store = GridStore::embedded(embedded_map());
        let records = generate(2_500, BASE, 42).unwrap();
        store.seed_if_empty(&records).await.unwrap();

        for record in &records {
            let found = store.get_by_id(&record.student_no).await.unwrap();
            assert_eq!(found.as_ref(), Some(record));
        }
    }

    #[tokio::test]
    async fn test_get_outside_range_is_none() {
        let store = GridStore::embedded(embedded_map());
        let records = generate(100, BASE, 42).unwrap();
        store.seed_if_empty(&records).await.unwrap();

        for missing in ["2025000000", "2025000101", "9999999999", "abc"] {
            assert!(store.get_by_id(missing).await.unwrap().is_none(), "{}", missing);
        }
    }

    // ============================================================
    // CLOSE
    // ============================================================

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let store = GridStore::embedded(embedded_map());

        assert!(store.close().await.is_ok());
        assert!(store.close().await.is_ok());
        assert!(store.is_closed().await);
    }

    #[tokio::test]
    async fn test_close_releases_map_handle() {
        let map = embedded_map();
        let store = GridStore::embedded(map.clone());
        assert_eq!(Arc::strong_count(&map), 2);

        store.close().await.unwrap();

        assert_eq!(Arc::strong_count(&map), 1);
    }

    #[tokio::test]
    async fn test_seed_after_close_is_store_error() {
        let store = GridStore::embedded(embedded_map());
        store.close().await.unwrap();

        let result = store.seed_if_empty(&generate(1, BASE, 42).unwrap()).await;
        assert!(matches!(result, Err(LabError::Store { backend: "grid", .. })));
    }

    #[tokio::test]
    async fn test_get_after_close_is_store_error() {
        let store = GridStore::embedded(embedded_map());
        let records = generate(10, BASE, 42).unwrap();
        store.seed_if_empty(&records).await.unwrap();
        store.close().await.unwrap();

        let result = store.get_by_id("2025000001").await;
        assert!(matches!(result, Err(LabError::Store { backend: "grid", .. })));
    }

    // ============================================================
    // BACKEND KEY SHAPES
    // ============================================================

    #[test]
    fn test_cache_key_is_namespaced() {
        assert_eq!(cache_key("2025000001"), "student:2025000001");
    }

    #[test]
    fn test_document_filter_targets_student_no() {
        let filter = id_filter("2025000001");
        assert_eq!(filter.get_str("student_no").unwrap(), "2025000001");
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_cache_payload_round_trips_record() {
        let record = StudentRecord::new("2025000001", "Ece Yıldırım", "Physics");
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"student_no":"2025000001","name":"Ece Yıldırım","department":"Physics"}"#
        );
        let back: StudentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
