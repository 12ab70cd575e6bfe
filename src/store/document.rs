use super::{SeedOutcome, StudentStore, batch_count, sentinel};
use crate::dataset::StudentRecord;
use crate::error::{LabError, LabResult};

use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEFAULT_BATCH_SIZE: usize = 2000;

const BACKEND: &str = "document";

pub fn id_filter(student_no: &str) -> Document {
    doc! { "student_no": student_no }
}

/// Document adapter: one MongoDB document per student.
///
/// `connect` creates a unique ascending index on `student_no` before anything
/// is written, so reseeding over existing documents fails with a duplicate-key
/// error instead of duplicating data.
pub struct DocumentStore {
    client: Client,
    collection: Collection<StudentRecord>,
    batch_size: usize,
    closed: AtomicBool,
}

impl DocumentStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> LabResult<Self> {
        tracing::info!("Connecting to MongoDB {}.{}", database, collection);

        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| LabError::connect(BACKEND, e))?;
        let collection = client
            .database(database)
            .collection::<StudentRecord>(collection);

        let index = IndexModel::builder()
            .keys(doc! { "student_no": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection
            .create_index(index)
            .await
            .map_err(|e| LabError::connect(BACKEND, e))?;

        Ok(Self {
            client,
            collection,
            batch_size: DEFAULT_BATCH_SIZE,
            closed: AtomicBool::new(false),
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn ensure_open(&self) -> LabResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LabError::closed(BACKEND));
        }
        Ok(())
    }
}

#[async_trait]
impl StudentStore for DocumentStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn seed_if_empty(&self, records: &[StudentRecord]) -> LabResult<SeedOutcome> {
        let first = sentinel(BACKEND, records)?;
        self.ensure_open()?;

        let existing = self
            .collection
            .find_one(id_filter(&first.student_no))
            .await
            .map_err(|e| LabError::seed(BACKEND, e))?;
        if existing.is_some() {
            tracing::info!("MongoDB already holds {}, skipping seed", first.student_no);
            return Ok(SeedOutcome::AlreadySeeded);
        }

        for batch in records.chunks(self.batch_size) {
            self.collection
                .insert_many(batch)
                .ordered(false)
                .await
                .map_err(|e| LabError::seed(BACKEND, e))?;
        }

        Ok(SeedOutcome::Seeded {
            records: records.len(),
            batches: batch_count(records.len(), self.batch_size),
        })
    }

    async fn get_by_id(&self, student_no: &str) -> LabResult<Option<StudentRecord>> {
        self.ensure_open()?;

        self.collection
            .find_one(id_filter(student_no))
            .await
            .map_err(|e| LabError::store(BACKEND, e))
    }

    async fn close(&self) -> LabResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.client.clone().shutdown().await;
        tracing::info!("Closed MongoDB client");
        Ok(())
    }
}
