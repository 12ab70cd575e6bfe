//! Error taxonomy shared by the dataset generator and the store adapters.
//!
//! A missing record is not an error: lookups return `Ok(None)`. Everything here
//! is either fatal at startup (`InvalidArgument`, `Connect`, `Seed`) or turned
//! into an HTTP 500 by the router (`Store`).

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type LabResult<T> = Result<T, LabError>;

#[derive(Debug, Error)]
pub enum LabError {
    /// Bad generator or seed parameters.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The adapter could not reach or prepare its backend.
    #[error("{backend} connect failed: {source}")]
    Connect {
        backend: &'static str,
        #[source]
        source: BoxError,
    },

    /// A batch write was rejected during the initial load.
    #[error("{backend} seed failed: {source}")]
    Seed {
        backend: &'static str,
        #[source]
        source: BoxError,
    },

    /// Transport failure or corrupt payload during a lookup.
    #[error("{backend} lookup failed: {source}")]
    Store {
        backend: &'static str,
        #[source]
        source: BoxError,
    },
}

impl LabError {
    pub fn connect(backend: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Connect {
            backend,
            source: source.into(),
        }
    }

    pub fn seed(backend: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Seed {
            backend,
            source: source.into(),
        }
    }

    pub fn store(backend: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Store {
            backend,
            source: source.into(),
        }
    }

    pub fn closed(backend: &'static str) -> Self {
        Self::store(backend, "store is closed")
    }
}
