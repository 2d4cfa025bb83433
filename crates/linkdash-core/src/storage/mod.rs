//! Storage layer
//!
//! A durable, synchronous key-value store keyed by string. The link store
//! only ever reads and writes one serialized blob through this interface.
//!
//! ## Backends
//!
//! - **SQLite** (`SqliteStore`): default, a single `kv` table
//! - **Files** (`FileStore`): one atomically written file per key
//! - **Memory** (`MemoryStore`): nothing persisted, optional quota

pub mod error;
pub mod file;
pub mod memory;
mod schema;
pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::config::Config;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Synchronous string key-value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// Which storage adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl Backend {
    /// Parse a backend name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sqlite" => Some(Backend::Sqlite),
            "file" => Some(Backend::File),
            "memory" => Some(Backend::Memory),
            _ => None,
        }
    }

    /// Name as written in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::File => "file",
            Backend::Memory => "memory",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Open the backend selected by the configuration
pub fn open_backend(config: &Config) -> StorageResult<Box<dyn KeyValueStore>> {
    let store: Box<dyn KeyValueStore> = match config.backend {
        Backend::Sqlite => Box::new(SqliteStore::open(&config.sqlite_path())?),
        Backend::File => Box::new(FileStore::open(config.data_dir.clone())?),
        Backend::Memory => Box::new(MemoryStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir, backend: Backend) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            backend,
            ..Config::default()
        }
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(Backend::parse("sqlite"), Some(Backend::Sqlite));
        assert_eq!(Backend::parse("FILE"), Some(Backend::File));
        assert_eq!(Backend::parse("memory"), Some(Backend::Memory));
        assert_eq!(Backend::parse("redis"), None);
    }

    #[test]
    fn test_open_sqlite_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, Backend::Sqlite);

        let mut store = open_backend(&config).unwrap();
        store.set("k", "v").unwrap();

        assert!(config.sqlite_path().exists());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_open_file_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, Backend::File);

        let mut store = open_backend(&config).unwrap();
        store.set("k", "v").unwrap();

        assert!(temp_dir.path().join("k.json").exists());
    }

    #[test]
    fn test_memory_backend_touches_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().join("data"),
            backend: Backend::Memory,
            ..Config::default()
        };

        let mut store = open_backend(&config).unwrap();
        store.set("k", "v").unwrap();

        assert!(!config.data_dir.exists());
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
