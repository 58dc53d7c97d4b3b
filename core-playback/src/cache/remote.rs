//! Cache-then-download resolution of remote sources.

use super::{CacheKeyDeriver, CacheStore};
use crate::downloader::Downloader;
use crate::error::{DownloadError, Result, SoundError};
use core_runtime::logging::redact_url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Turns a remote URL into a fresh local file, downloading on a miss.
pub struct RemoteSourceCache {
    deriver: CacheKeyDeriver,
    store: CacheStore,
    downloader: Downloader,
}

impl RemoteSourceCache {
    pub fn new(deriver: CacheKeyDeriver, store: CacheStore, downloader: Downloader) -> Self {
        Self {
            deriver,
            store,
            downloader,
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn deriver(&self) -> &CacheKeyDeriver {
        &self.deriver
    }

    /// Return a local path holding `url`'s payload no older than `ttl`.
    ///
    /// Concurrent fetches of the same URL may both download; the last rename
    /// wins and both paths stay valid.
    #[instrument(skip(self, url), fields(url = %redact_url(url)))]
    pub async fn fetch(&self, url: &str, ttl: Duration) -> Result<PathBuf> {
        let key = self.deriver.derive_key(url);

        if let Some(path) = self.store.lookup(&key, ttl).await? {
            debug!(key = %key, "Using cached sound");
            return Ok(path);
        }

        info!(key = %key, "Downloading sound");
        let data = self.downloader.download(url).await?;
        // A payload that cannot be persisted is a failed download.
        let path = self.store.write(&key, data).await.map_err(|e| match e {
            SoundError::Cache(message) => SoundError::DownloadFailed(DownloadError::Store(message)),
            other => other,
        })?;

        info!(key = %key, path = ?path, "Sound cached");
        Ok(path)
    }
}
