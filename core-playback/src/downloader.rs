//! # Downloader
//!
//! Fetches a remote sound into memory with bounded connect and read waits.
//! One attempt per call; callers surface failures without retrying.

use crate::error::DownloadError;
use bridge_traits::HttpClient;
use bytes::{Bytes, BytesMut};
use core_runtime::config::DownloadSettings;
use core_runtime::logging::redact_url;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

const READ_CHUNK_SIZE: usize = 16 * 1024;

pub struct Downloader {
    http_client: Arc<dyn HttpClient>,
    settings: DownloadSettings,
}

impl Downloader {
    pub fn new(http_client: Arc<dyn HttpClient>, settings: DownloadSettings) -> Self {
        Self {
            http_client,
            settings,
        }
    }

    /// Download the full body of `url`.
    ///
    /// `connect_timeout` bounds obtaining the response; `read_timeout` bounds
    /// each wait for body data, so a slow but steady transfer is not cut off.
    #[instrument(skip(self, url), fields(url = %redact_url(url)))]
    pub async fn download(&self, url: &str) -> Result<Bytes, DownloadError> {
        let mut body = timeout(
            self.settings.connect_timeout,
            self.http_client.download_stream(url.to_string()),
        )
        .await
        .map_err(|_| {
            warn!("Timed out waiting for response");
            DownloadError::Timeout
        })??;

        let mut data = BytesMut::new();
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let read = timeout(self.settings.read_timeout, body.read(&mut chunk))
                .await
                .map_err(|_| {
                    warn!(received = data.len(), "Timed out reading response body");
                    DownloadError::Timeout
                })??;

            if read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..read]);
        }

        debug!(size = data.len(), "Download complete");
        Ok(data.freeze())
    }
}
