use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const DEFAULT_PARTITION_COUNT: u32 = 271;

#[derive(Debug, Clone)]
pub struct Partitioner {
    num_partitions: u32,
}

impl Partitioner {
    pub fn new() -> Self {
        Self::with_partitions(DEFAULT_PARTITION_COUNT)
    }

    pub fn with_partitions(num_partitions: u32) -> Self {
        Self {
            num_partitions: num_partitions.max(1),
        }
    }

    pub fn num_partitions(&self) -> u32 {
        self.num_partitions
    }

    pub fn get_partition(&self, key: &str) -> u32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let hash = hasher.finish() as u32;
        hash % self.num_partitions
    }
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new()
    }
}
