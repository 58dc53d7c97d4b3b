//! Cache directory access through `tokio::fs`

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{FileMetadata, FileSystemAccess},
};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::{debug, trace};

/// Desktop [`FileSystemAccess`] rooted at the user cache directory
/// (`~/.cache`, `~/Library/Caches`, `%LOCALAPPDATA%`).
///
/// The sound cache lives in a subdirectory of this root; the root itself is
/// created lazily on first use.
#[derive(Debug, Clone)]
pub struct TokioFileSystem {
    root: PathBuf,
}

impl TokioFileSystem {
    /// Root at the platform cache directory, or the temp directory when the
    /// platform has none.
    pub fn new() -> Self {
        Self {
            root: dirs::cache_dir().unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn with_cache_directory(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for TokioFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn epoch_millis(time: SystemTime) -> Option<i64> {
    let since_epoch = time.duration_since(UNIX_EPOCH).ok()?;
    i64::try_from(since_epoch.as_millis()).ok()
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn get_cache_directory(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).await?;
        Ok(self.root.clone())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(fs::try_exists(path).await?)
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let metadata = fs::metadata(path).await?;
        Ok(FileMetadata {
            size: metadata.len(),
            modified_at: metadata.modified().ok().and_then(epoch_millis),
            is_directory: metadata.is_dir(),
        })
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        Ok(Bytes::from(fs::read(path).await?))
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()> {
        fs::write(path, &data).await?;
        trace!(path = ?path, size = data.len(), "Wrote file");
        Ok(())
    }

    /// `rename(2)` / `MoveFileEx` replace the destination atomically when
    /// both paths are in the same directory.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).await.map_err(|e| {
            BridgeError::OperationFailed(format!(
                "Failed to move {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await?;
        debug!(path = ?path, "Deleted file");
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut read_dir = fs::read_dir(path).await?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(entry.path());
        }
        Ok(entries)
    }
}
