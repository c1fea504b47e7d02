//! Byte store for menus, board listings and thread logs
//!
//! The engine only talks to the [`DatCache`] trait. Two stores ship with the
//! crate:
//! - [`MemoryCache`] keeps everything in a `DashMap` (tests, embedders)
//! - [`DiskCache`] mirrors the upstream layout under a root directory
//!
//! # Consistency contract
//!
//! For a given key, the size and modification time reported by
//! [`DatCache::stat`] must match the bytes a following [`DatCache::get`]
//! returns; writers never expose a torn entry. The engine does not
//! serialize concurrent fetches of the same key, so at most one writer per
//! key is the store's responsibility.

mod disk;
mod memory;

pub use disk::DiskCache;
pub use memory::MemoryCache;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::constants::upstream::SETTING_FILE;

/// Errors raised by a cache store
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("cache entry not found: {0}")]
    NotFound(String),

    /// Key component that cannot be mapped to a storage location
    #[error("invalid cache key component: {0:?}")]
    InvalidKey(String),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// `(server, board, thread)` address of a cached resource
///
/// Empty board and thread address the board menu; an empty thread addresses
/// the board listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub server: String,
    pub board: String,
    pub thread: String,
}

impl CacheKey {
    #[must_use]
    pub fn menu() -> Self {
        Self {
            server: String::new(),
            board: String::new(),
            thread: String::new(),
        }
    }

    #[must_use]
    pub fn board(server: &str, board: &str) -> Self {
        Self {
            server: server.to_string(),
            board: board.to_string(),
            thread: String::new(),
        }
    }

    #[must_use]
    pub fn thread(server: &str, board: &str, thread: &str) -> Self {
        Self {
            server: server.to_string(),
            board: board.to_string(),
            thread: thread.to_string(),
        }
    }

    /// Board settings file (title lookup)
    #[must_use]
    pub fn setting(server: &str, board: &str) -> Self {
        Self::thread(server, board, SETTING_FILE)
    }

    #[must_use]
    pub fn is_menu(&self) -> bool {
        self.board.is_empty() && self.thread.is_empty()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_menu() {
            return f.write_str("<menu>");
        }
        write!(f, "{}/{}", self.server, self.board)?;
        if !self.thread.is_empty() {
            write!(f, "/{}", self.thread)?;
        }
        Ok(())
    }
}

/// Metadata of a cached entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStat {
    pub size: u64,
    /// Modification time, unix seconds
    pub modified: i64,
    /// Access time, unix seconds
    pub accessed: i64,
}

/// Storage collaborator used by the fetch engine
#[async_trait]
pub trait DatCache: Send + Sync + fmt::Debug {
    /// Human-readable location of the entry (file path, map key, ...)
    fn path(&self, key: &CacheKey) -> String;

    async fn get(&self, key: &CacheKey) -> Result<Bytes, CacheError>;

    /// Replace the entry
    async fn set(&self, key: &CacheKey, data: &[u8]) -> Result<(), CacheError>;

    /// Append to the entry, creating it if absent
    async fn append(&self, key: &CacheKey, data: &[u8]) -> Result<(), CacheError>;

    async fn set_modified(
        &self,
        key: &CacheKey,
        modified: i64,
        accessed: i64,
    ) -> Result<(), CacheError>;

    async fn exists(&self, key: &CacheKey) -> bool;

    async fn stat(&self, key: &CacheKey) -> Result<CacheStat, CacheError>;
}

/// Current time as unix seconds
#[inline]
#[must_use]
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
