use super::{SeedOutcome, StudentStore, batch_count, sentinel};
use crate::dataset::StudentRecord;
use crate::error::{LabError, LabResult};
use crate::grid::{GridClient, GridMap};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const MAP_NAME: &str = "students";
pub const DEFAULT_BATCH_SIZE: usize = 2000;

const BACKEND: &str = "grid";

#[derive(Clone)]
enum GridBackend {
    Embedded(Arc<GridMap<String, StudentRecord>>),
    Client(GridClient),
}

/// Grid adapter: student records as native values in the `students` map.
///
/// `close` drops the map handle or the HTTP client, whichever is held.
pub struct GridStore {
    backend: RwLock<Option<GridBackend>>,
    batch_size: usize,
}

impl GridStore {
    /// Uses a map hosted by this process.
    pub fn embedded(map: Arc<GridMap<String, StudentRecord>>) -> Self {
        Self::with_backend(GridBackend::Embedded(map))
    }

    /// Uses the `students` map of a running member at `address`.
    pub fn client(address: &str) -> Self {
        Self::with_backend(GridBackend::Client(GridClient::new(address, MAP_NAME)))
    }

    fn with_backend(backend: GridBackend) -> Self {
        Self {
            backend: RwLock::new(Some(backend)),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    async fn open_backend(&self) -> LabResult<GridBackend> {
        self.backend
            .read()
            .await
            .clone()
            .ok_or_else(|| LabError::closed(BACKEND))
    }

    pub async fn is_closed(&self) -> bool {
        self.backend.read().await.is_none()
    }
}

impl GridBackend {
    async fn contains_key(&self, key: &str) -> anyhow::Result<bool> {
        match self {
            GridBackend::Embedded(map) => Ok(map.contains_key(&key.to_string())),
            GridBackend::Client(client) => client.contains_key(key).await,
        }
    }

    async fn put_batch(&self, batch: &[StudentRecord]) -> anyhow::Result<()> {
        let entries: Vec<(String, StudentRecord)> = batch
            .iter()
            .map(|record| (record.student_no.clone(), record.clone()))
            .collect();

        match self {
            GridBackend::Embedded(map) => {
                map.put_all(entries);
            }
            GridBackend::Client(client) => {
                client.put_all(&entries).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for GridStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn seed_if_empty(&self, records: &[StudentRecord]) -> LabResult<SeedOutcome> {
        let first = sentinel(BACKEND, records)?;
        let backend = self.open_backend().await?;

        let present = backend
            .contains_key(&first.student_no)
            .await
            .map_err(|e| LabError::seed(BACKEND, e))?;
        if present {
            tracing::info!("Grid map already holds {}, skipping seed", first.student_no);
            return Ok(SeedOutcome::AlreadySeeded);
        }

        for batch in records.chunks(self.batch_size) {
            backend
                .put_batch(batch)
                .await
                .map_err(|e| LabError::seed(BACKEND, e))?;
        }

        Ok(SeedOutcome::Seeded {
            records: records.len(),
            batches: batch_count(records.len(), self.batch_size),
        })
    }

    async fn get_by_id(&self, student_no: &str) -> LabResult<Option<StudentRecord>> {
        match self.open_backend().await? {
            GridBackend::Embedded(map) => Ok(map.get(&student_no.to_string())),
            GridBackend::Client(client) => client
                .get::<StudentRecord>(student_no)
                .await
                .map_err(|e| LabError::store(BACKEND, e)),
        }
    }

    async fn close(&self) -> LabResult<()> {
        let Some(backend) = self.backend.write().await.take() else {
            return Ok(());
        };
        match backend {
            GridBackend::Embedded(map) => {
                tracing::info!(
                    "Leaving embedded grid map '{}' ({} entries)",
                    map.name(),
                    map.entry_count()
                );
            }
            GridBackend::Client(client) => {
                tracing::info!("Disconnecting grid client from {}", client.base_url());
            }
        }
        Ok(())
    }
}
