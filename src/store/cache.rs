use super::{SeedOutcome, StudentStore, batch_count, sentinel};
use crate::dataset::StudentRecord;
use crate::error::{LabError, LabResult};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::RwLock;

pub const KEY_PREFIX: &str = "student:";
pub const DEFAULT_BATCH_SIZE: usize = 1000;

const BACKEND: &str = "cache";

pub fn cache_key(student_no: &str) -> String {
    format!("{}{}", KEY_PREFIX, student_no)
}

/// Cache adapter: each student is a JSON string under `student:<no>` in Redis.
///
/// `close` takes the connection out, so a closed store holds no socket.
pub struct CacheStore {
    connection: RwLock<Option<ConnectionManager>>,
    batch_size: usize,
}

impl CacheStore {
    pub async fn connect(host: &str, port: u16) -> LabResult<Self> {
        let url = format!("redis://{}:{}/", host, port);
        tracing::info!("Connecting to Redis at {}", url);

        let client = redis::Client::open(url).map_err(|e| LabError::connect(BACKEND, e))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| LabError::connect(BACKEND, e))?;

        Ok(Self {
            connection: RwLock::new(Some(connection)),
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    async fn connection(&self) -> LabResult<ConnectionManager> {
        self.connection
            .read()
            .await
            .clone()
            .ok_or_else(|| LabError::closed(BACKEND))
    }

    pub async fn is_closed(&self) -> bool {
        self.connection.read().await.is_none()
    }
}

#[async_trait]
impl StudentStore for CacheStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn seed_if_empty(&self, records: &[StudentRecord]) -> LabResult<SeedOutcome> {
        let first = sentinel(BACKEND, records)?;
        let mut conn = self.connection().await?;

        let sentinel_key = cache_key(&first.student_no);
        let exists: bool = conn
            .exists(&sentinel_key)
            .await
            .map_err(|e| LabError::seed(BACKEND, e))?;
        if exists {
            tracing::info!("Redis already holds {}, skipping seed", sentinel_key);
            return Ok(SeedOutcome::AlreadySeeded);
        }

        for batch in records.chunks(self.batch_size) {
            let mut pipe = redis::pipe();
            for record in batch {
                let json = serde_json::to_string(record).map_err(|e| LabError::seed(BACKEND, e))?;
                pipe.set(cache_key(&record.student_no), json).ignore();
            }
            let _: () = pipe
                .query_async(&mut conn)
                .await
                .map_err(|e| LabError::seed(BACKEND, e))?;
        }

        Ok(SeedOutcome::Seeded {
            records: records.len(),
            batches: batch_count(records.len(), self.batch_size),
        })
    }

    async fn get_by_id(&self, student_no: &str) -> LabResult<Option<StudentRecord>> {
        let mut conn = self.connection().await?;

        let json: Option<String> = conn
            .get(cache_key(student_no))
            .await
            .map_err(|e| LabError::store(BACKEND, e))?;

        match json {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| LabError::store(BACKEND, e)),
            None => Ok(None),
        }
    }

    async fn close(&self) -> LabResult<()> {
        let Some(connection) = self.connection.write().await.take() else {
            return Ok(());
        };
        // In-flight lookups may still hold a clone; the socket goes with the last one.
        drop(connection);
        tracing::info!("Closed Redis store");
        Ok(())
    }
}
