//! In-memory cache store

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

use super::{CacheError, CacheKey, CacheStat, DatCache, unix_now};

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    modified: i64,
    accessed: i64,
}

/// `DashMap`-backed store
///
/// Every operation holds the shard lock for its key for the whole update,
/// so a `stat` never observes a half-applied `append`. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<CacheKey, Entry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seed an entry with explicit times (test setup)
    pub fn insert_with_times(&self, key: CacheKey, data: &[u8], modified: i64, accessed: i64) {
        self.entries.insert(
            key,
            Entry {
                data: data.to_vec(),
                modified,
                accessed,
            },
        );
    }
}

#[async_trait]
impl DatCache for MemoryCache {
    fn path(&self, key: &CacheKey) -> String {
        format!("memory://{}", key)
    }

    async fn get(&self, key: &CacheKey) -> Result<Bytes, CacheError> {
        self.entries
            .get(key)
            .map(|entry| Bytes::copy_from_slice(&entry.data))
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn set(&self, key: &CacheKey, data: &[u8]) -> Result<(), CacheError> {
        let now = unix_now();
        self.entries.insert(
            key.clone(),
            Entry {
                data: data.to_vec(),
                modified: now,
                accessed: now,
            },
        );
        Ok(())
    }

    async fn append(&self, key: &CacheKey, data: &[u8]) -> Result<(), CacheError> {
        let now = unix_now();
        let mut entry = self.entries.entry(key.clone()).or_insert_with(|| Entry {
            data: Vec::new(),
            modified: now,
            accessed: now,
        });
        entry.data.extend_from_slice(data);
        entry.modified = now;
        Ok(())
    }

    async fn set_modified(
        &self,
        key: &CacheKey,
        modified: i64,
        accessed: i64,
    ) -> Result<(), CacheError> {
        let mut entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        entry.modified = modified;
        entry.accessed = accessed;
        Ok(())
    }

    async fn exists(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    async fn stat(&self, key: &CacheKey) -> Result<CacheStat, CacheError> {
        self.entries
            .get(key)
            .map(|entry| CacheStat {
                size: entry.data.len() as u64,
                modified: entry.modified,
                accessed: entry.accessed,
            })
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }
}
