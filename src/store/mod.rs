//! Store Adapters Module
//!
//! One trait, three backends. Every adapter seeds the dataset at most once,
//! answers point lookups by student number and releases its connection on close.
//!
//! ## Seeding protocol
//! 1. **Sentinel**: If the first record of the dataset is already present, the
//!    backend is considered seeded and nothing is written.
//! 2. **Batches**: Otherwise records are written in order, in fixed-size batches.
//!    A failed batch aborts the seed; there is no resume. The whole seed is not
//!    atomic: a crash part way through can leave a partial dataset behind.
//!
//! ## Submodules
//! - **`cache`**: Redis, JSON text under `student:<no>` keys.
//! - **`grid`**: The in-crate data grid, embedded or via a remote member.
//! - **`document`**: MongoDB, one document per student with a unique index.

pub mod cache;
pub mod document;
pub mod grid;

pub use cache::CacheStore;
pub use document::DocumentStore;
pub use grid::GridStore;

use crate::dataset::StudentRecord;
use crate::error::{LabError, LabResult};
use async_trait::async_trait;

/// Result of a `seed_if_empty` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The sentinel record was found; nothing was written.
    AlreadySeeded,
    /// The full dataset was written.
    Seeded { records: usize, batches: usize },
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Short backend label used in logs and error messages.
    fn backend(&self) -> &'static str;

    /// Writes `records` unless the backend already holds `records[0]`.
    async fn seed_if_empty(&self, records: &[StudentRecord]) -> LabResult<SeedOutcome>;

    /// Point lookup. A missing student is `Ok(None)`.
    async fn get_by_id(&self, student_no: &str) -> LabResult<Option<StudentRecord>>;

    /// Releases the backend connection. Calling it again is a no-op.
    async fn close(&self) -> LabResult<()>;
}

/// Returns the sentinel record, rejecting an empty dataset.
pub(crate) fn sentinel<'a>(
    backend: &'static str,
    records: &'a [StudentRecord],
) -> LabResult<&'a StudentRecord> {
    records.first().ok_or_else(|| {
        LabError::InvalidArgument(format!("{} cannot be seeded with an empty dataset", backend))
    })
}

pub(crate) fn batch_count(records: usize, batch_size: usize) -> usize {
    records.div_ceil(batch_size)
}

#[cfg(test)]
mod tests;
