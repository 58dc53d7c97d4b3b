//! Test doubles for the sound player module tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    AssetResolver, AudioSource, FileMetadata, FileSystemAccess, HttpClient, PlaybackAdapter,
    PlayerHandle, PlayerListener, PlayerRequest,
};
use bytes::Bytes;
use core_runtime::config::PlayerConfig;
use core_service::SoundPlayerModule;
use mockall::mock;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

mock! {
    pub Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn download_stream(&self, url: String) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
    }
}

/// A cache directory that has never been created.
pub struct EmptyFs;

#[async_trait]
impl FileSystemAccess for EmptyFs {
    async fn get_cache_directory(&self) -> BridgeResult<PathBuf> {
        Ok(PathBuf::from("/cache"))
    }

    async fn exists(&self, _path: &Path) -> BridgeResult<bool> {
        Ok(false)
    }

    async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata> {
        Err(BridgeError::NotAvailable(path.display().to_string()))
    }

    async fn create_dir_all(&self, _path: &Path) -> BridgeResult<()> {
        Err(BridgeError::OperationFailed("read-only".into()))
    }

    async fn read_file(&self, path: &Path) -> BridgeResult<Bytes> {
        Err(BridgeError::NotAvailable(path.display().to_string()))
    }

    async fn write_file(&self, _path: &Path, _data: Bytes) -> BridgeResult<()> {
        Err(BridgeError::OperationFailed("read-only".into()))
    }

    async fn rename(&self, _from: &Path, _to: &Path) -> BridgeResult<()> {
        Err(BridgeError::OperationFailed("read-only".into()))
    }

    async fn delete_file(&self, _path: &Path) -> BridgeResult<()> {
        Ok(())
    }

    async fn list_directory(&self, _path: &Path) -> BridgeResult<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

/// Platform player that keeps each listener so tests can finish or fail it.
#[derive(Default)]
pub struct FakePlayer {
    requests: Mutex<Vec<(PlayerHandle, PlayerRequest)>>,
    released: Mutex<Vec<PlayerHandle>>,
}

impl FakePlayer {
    pub fn requests(&self) -> Vec<(PlayerHandle, PlayerRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn released(&self) -> Vec<PlayerHandle> {
        self.released.lock().unwrap().clone()
    }

    pub fn last(&self) -> (PlayerHandle, Arc<dyn PlayerListener>) {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|(handle, request)| (*handle, Arc::clone(&request.listener)))
            .expect("a player was prepared")
    }
}

#[async_trait]
impl PlaybackAdapter for FakePlayer {
    async fn prepare(&self, request: PlayerRequest) -> BridgeResult<PlayerHandle> {
        let handle = PlayerHandle::new();
        self.requests.lock().unwrap().push((handle, request));
        Ok(handle)
    }

    async fn start(&self, _player: PlayerHandle) -> BridgeResult<()> {
        Ok(())
    }

    async fn seek_to_start(&self, _player: PlayerHandle) -> BridgeResult<()> {
        Ok(())
    }

    async fn stop(&self, _player: PlayerHandle) -> BridgeResult<()> {
        Ok(())
    }

    async fn reset(&self, _player: PlayerHandle) -> BridgeResult<()> {
        Ok(())
    }

    async fn release(&self, player: PlayerHandle) -> BridgeResult<()> {
        self.released.lock().unwrap().push(player);
        Ok(())
    }
}

/// Bundle with a `click` and an `ambient` sound.
pub struct Bundle;

#[async_trait]
impl AssetResolver for Bundle {
    async fn resolve(&self, name: &str) -> BridgeResult<Option<AudioSource>> {
        let stem = bridge_traits::playback::asset_stem(name);
        Ok(matches!(stem.as_str(), "click" | "ambient").then(|| AudioSource::BundledAsset {
            location: PathBuf::from(format!("/assets/{}.mp3", stem)),
            name: stem,
        }))
    }
}

pub fn module() -> (SoundPlayerModule, Arc<FakePlayer>) {
    let mut http = MockHttp::new();
    http.expect_download_stream().never();
    let player = Arc::new(FakePlayer::default());

    let config = PlayerConfig::builder()
        .playback_adapter(player.clone())
        .asset_resolver(Arc::new(Bundle))
        .http_client(Arc::new(http))
        .file_system(Arc::new(EmptyFs))
        .build()
        .expect("valid config");

    (SoundPlayerModule::new(config), player)
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2s");
}
