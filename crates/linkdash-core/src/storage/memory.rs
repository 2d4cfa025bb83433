//! In-process backend
//!
//! Nothing survives the process. An optional byte quota mimics the host
//! quota of durable stores so write failures can be exercised.

use std::collections::HashMap;

use super::error::{StorageError, StorageResult};
use super::KeyValueStore;

/// Key-value store held in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once total value bytes
    /// would exceed `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Change the quota (None removes it)
    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Total bytes of stored values
    pub fn used_bytes(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, String::len);
            let needed = self.used_bytes() - replaced + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    details: format!("{} bytes needed, quota is {}", needed, quota),
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
