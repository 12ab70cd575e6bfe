//! Environment configuration.
//!
//! Every option has a default. Blank values count as unset and values are
//! trimmed; anything that fails to parse stops startup.

use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    /// The map lives in this process.
    Embedded,
    /// The map lives in a remote member reached over HTTP.
    Client,
}

impl FromStr for GridMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "embedded" => Ok(Self::Embedded),
            "client" => Ok(Self::Client),
            other => Err(anyhow::anyhow!(
                "unknown grid mode '{}', expected 'embedded' or 'client'",
                other
            )),
        }
    }
}

impl fmt::Display for GridMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded"),
            Self::Client => f.write_str("client"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub mode: GridMode,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub size: usize,
    pub base_student_no: u64,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct LabConfig {
    pub port: u16,
    pub worker_threads: usize,
    pub cache: CacheConfig,
    pub document: DocumentConfig,
    pub grid: GridConfig,
    pub dataset: DatasetConfig,
}

impl LabConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        Ok(Self {
            port: env.parse("PORT", 8080)?,
            worker_threads: env.parse("WORKER_THREADS", default_worker_threads())?,
            cache: CacheConfig {
                host: env.string("REDIS_HOST", "localhost"),
                port: env.parse("REDIS_PORT", 6379)?,
            },
            document: DocumentConfig {
                uri: env.string("MONGO_URI", "mongodb://localhost:27017"),
                database: env.string("MONGO_DB", "nosql_lab"),
                collection: env.string("MONGO_COLLECTION", "students"),
            },
            grid: GridConfig {
                mode: env.parse("HZ_MODE", GridMode::Embedded)?,
                address: env.string("HZ_ADDR", "localhost:5701"),
            },
            dataset: DatasetConfig {
                size: env.parse("SEED_COUNT", 10_000)?,
                base_student_no: env.parse("STUDENT_NO_START", 2_025_000_001)?,
                seed: env.parse("SEED_RNG", 42)?,
            },
        })
    }
}

/// At least 8 workers, or twice the available cores.
pub fn default_worker_threads() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cores * 2).max(8)
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn value(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.value(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.value(key) {
            Some(raw) => raw
                .parse()
                .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
                .with_context(|| format!("invalid value '{}' for {}", raw, key)),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<LabConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LabConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cache.host, "localhost");
        assert_eq!(config.cache.port, 6379);
        assert_eq!(config.document.uri, "mongodb://localhost:27017");
        assert_eq!(config.document.database, "nosql_lab");
        assert_eq!(config.document.collection, "students");
        assert_eq!(config.grid.mode, GridMode::Embedded);
        assert_eq!(config.grid.address, "localhost:5701");
        assert_eq!(config.dataset.size, 10_000);
        assert_eq!(config.dataset.base_student_no, 2_025_000_001);
        assert_eq!(config.dataset.seed, 42);
        assert!(config.worker_threads >= 8);
    }

    #[test]
    fn test_overrides_are_trimmed() {
        let config = config_from(&[
            ("REDIS_HOST", " cache.internal "),
            ("PORT", "9090"),
            ("HZ_MODE", "Client"),
            ("HZ_ADDR", "grid-1:5701"),
            ("SEED_COUNT", " 50 "),
            ("WORKER_THREADS", "16"),
        ])
        .unwrap();

        assert_eq!(config.cache.host, "cache.internal");
        assert_eq!(config.port, 9090);
        assert_eq!(config.grid.mode, GridMode::Client);
        assert_eq!(config.grid.address, "grid-1:5701");
        assert_eq!(config.dataset.size, 50);
        assert_eq!(config.worker_threads, 16);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("MONGO_DB", "   "), ("REDIS_PORT", "")]).unwrap();

        assert_eq!(config.document.database, "nosql_lab");
        assert_eq!(config.cache.port, 6379);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = config_from(&[("REDIS_PORT", "not-a-port")]).unwrap_err();
        assert!(format!("{:#}", err).contains("REDIS_PORT"));
    }

    #[test]
    fn test_unknown_grid_mode_is_rejected() {
        assert!(config_from(&[("HZ_MODE", "cluster")]).is_err());
    }

    #[test]
    fn test_default_worker_threads_floor() {
        assert!(default_worker_threads() >= 8);
    }
}
