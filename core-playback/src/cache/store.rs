//! # Cache Store
//!
//! A dedicated directory of downloaded payloads, one file per key, with the
//! file's modification time acting as the freshness timestamp. There is no
//! index file: the directory listing is the index.

use crate::error::{Result, SoundError};
use bridge_traits::{Clock, FileSystemAccess};
use bytes::Bytes;
use core_runtime::config::CacheSettings;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Marker inserted between the final file name and a random suffix while a
/// payload is being written.
const PART_MARKER: &str = ".part-";

/// Part files younger than this may belong to a write still in flight and
/// are left alone by maintenance.
const PART_FILE_GRACE: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
struct CacheFiles {
    payloads: Vec<PathBuf>,
    parts: Vec<PathBuf>,
}

/// Directory-backed payload store with age-based expiry.
pub struct CacheStore {
    fs: Arc<dyn FileSystemAccess>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
}

impl CacheStore {
    pub fn new(
        fs: Arc<dyn FileSystemAccess>,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            fs,
            clock,
            settings,
        }
    }

    /// Absolute path of the dedicated cache subdirectory.
    pub async fn directory(&self) -> Result<PathBuf> {
        let root = match &self.settings.root {
            Some(root) => root.clone(),
            None => self.fs.get_cache_directory().await.map_err(|e| {
                SoundError::Cache(format!("Failed to get cache directory: {}", e))
            })?,
        };
        Ok(root.join(&self.settings.subdirectory))
    }

    /// Path where the payload for `key` lives (whether or not it exists).
    pub async fn path_for(&self, key: &str) -> Result<PathBuf> {
        Ok(self.directory().await?.join(self.file_name(key)))
    }

    /// Return the cached path for `key` if it exists and is younger than `ttl`.
    ///
    /// A stale entry is deleted on the way out. Deletion is best-effort: a
    /// failure is logged and the lookup still reports a miss.
    #[instrument(skip(self), fields(ttl_secs = ttl.as_secs()))]
    pub async fn lookup(&self, key: &str, ttl: Duration) -> Result<Option<PathBuf>> {
        let path = self.path_for(key).await?;

        match self.fs.exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = ?path, "Cache miss");
                return Ok(None);
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to check cache entry, treating as miss");
                return Ok(None);
            }
        }

        if self.is_fresh(&path, ttl).await {
            debug!(path = ?path, "Cache hit");
            return Ok(Some(path));
        }

        info!(path = ?path, "Cache entry expired");
        self.remove_best_effort(&path).await;
        Ok(None)
    }

    /// Persist `data` under `key`, replacing any previous payload.
    ///
    /// The payload is written to a uniquely named part file and renamed onto
    /// the final path, so a concurrent `lookup` sees either the old file, no
    /// file, or the complete new one.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn write(&self, key: &str, data: Bytes) -> Result<PathBuf> {
        let dir = self.directory().await?;

        self.fs.create_dir_all(&dir).await.map_err(|e| {
            SoundError::Cache(format!("Failed to create cache directory: {}", e))
        })?;

        let file_name = self.file_name(key);
        let final_path = dir.join(&file_name);
        let part_path = dir.join(format!(
            "{}{}{}",
            file_name,
            PART_MARKER,
            uuid::Uuid::new_v4().simple()
        ));

        self.fs
            .write_file(&part_path, data)
            .await
            .map_err(|e| SoundError::Cache(format!("Failed to write cache file: {}", e)))?;

        if let Err(e) = self.fs.rename(&part_path, &final_path).await {
            self.remove_best_effort(&part_path).await;
            return Err(SoundError::Cache(format!(
                "Failed to move cache file into place: {}",
                e
            )));
        }

        debug!(path = ?final_path, "Cached payload written");
        Ok(final_path)
    }

    /// Delete every payload older than `ttl`, plus part files abandoned for
    /// longer than the write grace period.
    ///
    /// Returns the number of files removed.
    #[instrument(skip(self), fields(ttl_secs = ttl.as_secs()))]
    pub async fn purge_expired(&self, ttl: Duration) -> Result<usize> {
        let files = self.cache_files().await?;
        let mut removed = 0;
        for path in &files.payloads {
            if !self.is_fresh(path, ttl).await && self.remove_best_effort(path).await {
                removed += 1;
            }
        }
        for path in &files.parts {
            if !self.is_fresh(path, PART_FILE_GRACE).await
                && self.remove_best_effort(path).await
            {
                removed += 1;
            }
        }
        info!(removed, "Purged expired cache entries");
        Ok(removed)
    }

    /// Delete every payload regardless of age.
    ///
    /// Part files are skipped: a concurrent `write` renames its part file
    /// onto the payload path and must still find it.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for path in &self.cache_files().await?.payloads {
            if self.remove_best_effort(path).await {
                removed += 1;
            }
        }
        info!(removed, "Cleared sound cache");
        Ok(removed)
    }

    fn file_name(&self, key: &str) -> String {
        format!("{}.{}", key, self.settings.file_extension)
    }

    /// Payloads and part files in the cache directory. Anything else that
    /// happens to live there is left alone.
    async fn cache_files(&self) -> Result<CacheFiles> {
        let dir = self.directory().await?;
        let mut files = CacheFiles::default();

        let exists = self
            .fs
            .exists(&dir)
            .await
            .map_err(|e| SoundError::Cache(format!("Failed to access cache directory: {}", e)))?;
        if !exists {
            return Ok(files);
        }

        let entries = self
            .fs
            .list_directory(&dir)
            .await
            .map_err(|e| SoundError::Cache(format!("Failed to list cache directory: {}", e)))?;

        let suffix = format!(".{}", self.settings.file_extension);
        for path in entries {
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !name.starts_with(&self.settings.key_prefix) {
                continue;
            }
            if name.contains(PART_MARKER) {
                files.parts.push(path);
            } else if name.ends_with(&suffix) {
                files.payloads.push(path);
            }
        }
        Ok(files)
    }

    /// Fresh iff `now - mtime < ttl`. A zero TTL never hits. A modification
    /// time in the future counts as fresh; a file without one is stale.
    async fn is_fresh(&self, path: &Path, ttl: Duration) -> bool {
        if ttl.is_zero() {
            return false;
        }

        let metadata = match self.fs.metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to read cache entry metadata");
                return false;
            }
        };

        if metadata.is_directory {
            return false;
        }

        let Some(modified_ms) = metadata.modified_at else {
            return false;
        };

        let ttl_ms = i128::try_from(ttl.as_millis()).unwrap_or(i128::MAX);
        let age_ms = i128::from(self.clock.unix_timestamp_millis()) - i128::from(modified_ms);
        age_ms < ttl_ms
    }

    /// Returns `true` if the file was removed.
    async fn remove_best_effort(&self, path: &Path) -> bool {
        match self.fs.delete_file(path).await {
            Ok(()) => true,
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to delete cache file");
                false
            }
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
