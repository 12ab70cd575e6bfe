use super::partitioner::Partitioner;

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const PROCESSED_OPS_LIMIT: usize = 10_000;

/// A named, partitioned in-memory map.
///
/// Entries live in one inner `DashMap` per partition. Writes arrive as batches
/// (`put_all`); every applied batch bumps `mutation_count`, which callers use
/// to tell whether a write actually happened.
pub struct GridMap<K, V> {
    name: String,
    local_data: DashMap<u32, DashMap<K, V>>,
    processed_ops: DashMap<String, u64>,
    partitioner: Arc<Partitioner>,
    mutations: AtomicU64,
}

impl<K, V> GridMap<K, V>
where
    K: ToString + Clone + Hash + Eq + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(name: &str, partitioner: Arc<Partitioner>) -> Self {
        Self {
            name: name.to_string(),
            local_data: DashMap::new(),
            processed_ops: DashMap::new(),
            partitioner,
            mutations: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partition_of(&self, key: &K) -> u32 {
        self.partitioner.get_partition(&key.to_string())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let partition = self.partition_of(key);
        self.local_data
            .get(&partition)
            .map(|partition_map| partition_map.contains_key(key))
            .unwrap_or(false)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let partition = self.partition_of(key);

        if let Some(partition_map) = self.local_data.get(&partition)
            && let Some(value) = partition_map.get(key)
        {
            return Some(value.clone());
        }

        None
    }

    /// Stores every entry of the batch and returns how many were written.
    pub fn put_all(&self, entries: Vec<(K, V)>) -> usize {
        let written = entries.len();
        for (key, value) in entries {
            let partition = self.partition_of(&key);
            self.local_data
                .entry(partition)
                .or_insert_with(DashMap::new)
                .insert(key, value);
        }
        self.mutations.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Map '{}' stored batch of {} entries", self.name, written);
        written
    }

    /// Like `put_all`, but ignores a batch whose `op_id` was already applied.
    ///
    /// Returns `None` for a replayed operation.
    pub fn put_all_with_op(&self, op_id: &str, entries: Vec<(K, V)>) -> Option<usize> {
        if !self.should_process(op_id) {
            tracing::debug!("Map '{}' skipped replayed op {}", self.name, op_id);
            return None;
        }
        Some(self.put_all(entries))
    }

    fn should_process(&self, op_id: &str) -> bool {
        if self.processed_ops.contains_key(op_id) {
            return false;
        }
        if self.processed_ops.len() > PROCESSED_OPS_LIMIT {
            self.processed_ops.clear();
        }
        self.processed_ops.insert(op_id.to_string(), now_ms());
        true
    }

    pub fn entry_count(&self) -> usize {
        self.local_data
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }

    pub fn partition_count(&self) -> usize {
        self.local_data.len()
    }

    /// Number of write batches applied since the map was created.
    pub fn mutation_count(&self) -> u64 {
        self.mutations.load(Ordering::SeqCst)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
