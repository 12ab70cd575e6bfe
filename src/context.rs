use crate::dataset::StudentRecord;
use crate::grid::GridMap;
use crate::store::StudentStore;

use std::sync::Arc;

/// A lookup route prefix bound to one store.
#[derive(Clone)]
pub struct StoreBinding {
    pub prefix: String,
    pub store: Arc<dyn StudentStore>,
}

/// Everything the router and shutdown logic need, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    bindings: Arc<[StoreBinding]>,
    grid_member: Option<Arc<GridMap<String, StudentRecord>>>,
}

impl AppContext {
    pub fn new(bindings: Vec<StoreBinding>) -> Self {
        Self {
            bindings: bindings.into(),
            grid_member: None,
        }
    }

    /// Also serve the member protocol for an embedded grid map.
    pub fn with_grid_member(mut self, map: Arc<GridMap<String, StudentRecord>>) -> Self {
        self.grid_member = Some(map);
        self
    }

    pub fn bindings(&self) -> &[StoreBinding] {
        &self.bindings
    }

    pub fn grid_member(&self) -> Option<&Arc<GridMap<String, StudentRecord>>> {
        self.grid_member.as_ref()
    }

    /// Finds the binding whose prefix owns `path`.
    ///
    /// A prefix owns the path when it matches exactly or is followed by `/`;
    /// the longest such prefix wins.
    pub fn resolve(&self, path: &str) -> Option<&StoreBinding> {
        self.bindings
            .iter()
            .filter(|binding| {
                path.strip_prefix(binding.prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .max_by_key(|binding| binding.prefix.len())
    }

    /// Closes every bound store. Failures are logged and do not stop the others.
    pub async fn close_all(&self) {
        for binding in self.bindings.iter() {
            let backend = binding.store.backend();
            match binding.store.close().await {
                Ok(()) => tracing::debug!("Closed {} store for {}", backend, binding.prefix),
                Err(e) => tracing::warn!("Failed to close {} store: {}", backend, e),
            }
        }
    }
}
