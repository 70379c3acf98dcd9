//! In-memory registry.
//!
//! Used by tests and by `backend = "memory"` for local development.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::registry::{normalize_key, Registry, RegistryError};

/// Registry backed by a concurrent hash map.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: DashMap<String, String>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn set(&self, key: &str, value: &str) -> Result<(), RegistryError> {
        self.entries.insert(normalize_key(key), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, RegistryError> {
        let key = normalize_key(key);
        self.entries
            .get(&key)
            .map(|entry| entry.value().clone())
            .ok_or(RegistryError::NotFound(key))
    }
}
