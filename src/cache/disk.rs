//! Directory-backed cache store
//!
//! Layout under the root:
//! - `bbsmenu.txt` for the menu
//! - `{server}/{board}/subject.txt` for board listings
//! - `{server}/{board}/dat/{thread}.dat` for thread logs
//! - `{server}/{board}/{name}` for other board resources (`SETTING.TXT`)
//!
//! Each entry has a `.meta` sidecar holding `"{modified} {accessed}"`. Full
//! writes go through a temp file and a rename so readers never see a
//! partial overwrite.

use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{CacheError, CacheKey, CacheStat, DatCache, unix_now};

const MENU_FILE: &str = "bbsmenu.txt";
const SUBJECT_FILE: &str = "subject.txt";

/// Filesystem store rooted at a directory
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &CacheKey) -> Result<PathBuf, CacheError> {
        if key.is_menu() {
            return Ok(self.root.join(MENU_FILE));
        }
        let server = component(&key.server)?;
        let board = component(&key.board)?;
        let dir = self.root.join(server).join(board);
        if key.thread.is_empty() {
            return Ok(dir.join(SUBJECT_FILE));
        }
        let thread = component(&key.thread)?;
        if thread.bytes().all(|b| b.is_ascii_digit()) {
            Ok(dir.join("dat").join(format!("{}.dat", thread)))
        } else {
            Ok(dir.join(thread))
        }
    }

    async fn write_meta(path: &Path, modified: i64, accessed: i64) -> Result<(), CacheError> {
        fs::write(meta_path(path), format!("{} {}", modified, accessed)).await?;
        Ok(())
    }

    async fn read_meta(path: &Path) -> Option<(i64, i64)> {
        let raw = fs::read_to_string(meta_path(path)).await.ok()?;
        let mut parts = raw.split_whitespace();
        let modified = parts.next()?.parse().ok()?;
        let accessed = parts.next()?.parse().ok()?;
        Some((modified, accessed))
    }
}

/// Reject components that would escape the root
fn component(part: &str) -> Result<&str, CacheError> {
    if part.is_empty() || part == "." || part == ".." || part.contains(['/', '\\']) {
        return Err(CacheError::InvalidKey(part.to_string()));
    }
    Ok(part)
}

fn meta_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".meta");
    PathBuf::from(name)
}

fn not_found(key: &CacheKey, err: std::io::Error) -> CacheError {
    if err.kind() == ErrorKind::NotFound {
        CacheError::NotFound(key.to_string())
    } else {
        CacheError::Io(err)
    }
}

#[async_trait]
impl DatCache for DiskCache {
    fn path(&self, key: &CacheKey) -> String {
        self.entry_path(key)
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    async fn get(&self, key: &CacheKey) -> Result<Bytes, CacheError> {
        let path = self.entry_path(key)?;
        fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| not_found(key, e))
    }

    async fn set(&self, key: &CacheKey, data: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &path).await?;
        let now = unix_now();
        Self::write_meta(&path, now, now).await
    }

    async fn append(&self, key: &CacheKey, data: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;
        let accessed = Self::read_meta(&path).await.map_or_else(unix_now, |(_, a)| a);
        Self::write_meta(&path, unix_now(), accessed).await
    }

    async fn set_modified(
        &self,
        key: &CacheKey,
        modified: i64,
        accessed: i64,
    ) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        fs::metadata(&path).await.map_err(|e| not_found(key, e))?;
        Self::write_meta(&path, modified, accessed).await
    }

    async fn exists(&self, key: &CacheKey) -> bool {
        match self.entry_path(key) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn stat(&self, key: &CacheKey) -> Result<CacheStat, CacheError> {
        let path = self.entry_path(key)?;
        let metadata = fs::metadata(&path).await.map_err(|e| not_found(key, e))?;
        let (modified, accessed) = match Self::read_meta(&path).await {
            Some(times) => times,
            None => {
                let mtime = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map_or(0, |d| d.as_secs() as i64);
                (mtime, mtime)
            }
        };
        Ok(CacheStat {
            size: metadata.len(),
            modified,
            accessed,
        })
    }
}
