//! File access for the download cache.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// What the cache needs to know about a directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    /// Last modification time, in milliseconds since the Unix epoch. `None`
    /// when the platform cannot report it.
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

/// File operations on the host's private cache area.
///
/// On Android this is `Context.getCacheDir()`, on iOS the app's
/// `Library/Caches`; the OS may purge either under storage pressure.
///
/// Implementations must not create parent directories implicitly in
/// [`write_file`](Self::write_file); callers create them with
/// [`create_dir_all`](Self::create_dir_all).
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Root of the host cache area.
    async fn get_cache_directory(&self) -> Result<PathBuf>;

    async fn exists(&self, path: &Path) -> Result<bool>;

    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    async fn read_file(&self, path: &Path) -> Result<Bytes>;

    /// Create or truncate `path` and write `data` to it.
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;

    /// Move `from` onto `to`, replacing any existing file at `to`.
    ///
    /// Within one directory this must be atomic: readers observe either the
    /// old file or the complete new one.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    async fn delete_file(&self, path: &Path) -> Result<()>;

    /// Full paths of the entries directly inside `path`.
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;
}
