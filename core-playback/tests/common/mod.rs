//! Shared test doubles for the playback integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    AssetResolver, AudioSource, Clock, FileMetadata, FileSystemAccess, HttpClient,
    PlaybackAdapter, PlayerHandle, PlayerListener, PlayerRequest,
};
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use core_playback::PlaybackController;
use core_runtime::config::PlayerConfig;
use mockall::mock;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CACHE_ROOT: &str = "/cache";
pub const START_MS: i64 = 1_700_000_000_000;

// ============================================================================
// Clock
// ============================================================================

pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_ms.load(Ordering::SeqCst))
            .single()
            .expect("valid timestamp")
    }
}

// ============================================================================
// File system
// ============================================================================

/// In-memory file system whose modification times come from a `ManualClock`.
pub struct MemoryFs {
    clock: Arc<ManualClock>,
    files: Mutex<HashMap<PathBuf, (Bytes, i64)>>,
    dirs: Mutex<HashSet<PathBuf>>,
    fail_deletes: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryFs {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            files: Mutex::new(HashMap::new()),
            dirs: Mutex::new(HashSet::new()),
            fail_deletes: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contents(&self, path: &Path) -> Option<Bytes> {
        self.files.lock().unwrap().get(path).map(|(data, _)| data.clone())
    }

    pub fn has_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        names.sort();
        names
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Place a file directly, bypassing the store.
    pub fn insert(&self, path: impl Into<PathBuf>, data: &'static [u8], modified_ms: i64) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.dirs.lock().unwrap().insert(parent.to_path_buf());
        }
        self.files
            .lock()
            .unwrap()
            .insert(path, (Bytes::from_static(data), modified_ms));
    }
}

#[async_trait]
impl FileSystemAccess for MemoryFs {
    async fn get_cache_directory(&self) -> BridgeResult<PathBuf> {
        Ok(PathBuf::from(CACHE_ROOT))
    }

    async fn exists(&self, path: &Path) -> BridgeResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path)
            || self.dirs.lock().unwrap().contains(path))
    }

    async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata> {
        if self.dirs.lock().unwrap().contains(path) {
            return Ok(FileMetadata {
                size: 0,
                modified_at: None,
                is_directory: true,
            });
        }
        let files = self.files.lock().unwrap();
        let (data, modified) = files
            .get(path)
            .ok_or_else(|| BridgeError::OperationFailed(format!("no such file: {:?}", path)))?;
        Ok(FileMetadata {
            size: data.len() as u64,
            modified_at: Some(*modified),
            is_directory: false,
        })
    }

    async fn create_dir_all(&self, path: &Path) -> BridgeResult<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> BridgeResult<Bytes> {
        self.contents(path)
            .ok_or_else(|| BridgeError::OperationFailed(format!("no such file: {:?}", path)))
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("no space left on device".into()));
        }
        let parent_exists = path
            .parent()
            .map(|parent| self.dirs.lock().unwrap().contains(parent))
            .unwrap_or(false);
        if !parent_exists {
            return Err(BridgeError::OperationFailed(format!(
                "parent directory missing for {:?}",
                path
            )));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), (data, self.clock.unix_timestamp_millis()));
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> BridgeResult<()> {
        let mut files = self.files.lock().unwrap();
        let entry = files
            .remove(from)
            .ok_or_else(|| BridgeError::OperationFailed(format!("no such file: {:?}", from)))?;
        files.insert(to.to_path_buf(), entry);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> BridgeResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("permission denied".into()));
        }
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    async fn list_directory(&self, path: &Path) -> BridgeResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }
}

// ============================================================================
// HTTP
// ============================================================================

mock! {
    pub Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn download_stream(&self, url: String) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
    }
}

pub fn body(data: &'static [u8]) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
    Ok(Box::new(std::io::Cursor::new(data.to_vec())))
}

// ============================================================================
// Platform player
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Prepare(PlayerHandle),
    Start(PlayerHandle),
    SeekToStart(PlayerHandle),
    Stop(PlayerHandle),
    Reset(PlayerHandle),
    Release(PlayerHandle),
}

/// Records every lifecycle call and keeps listeners so tests can play the
/// platform's part.
#[derive(Default)]
pub struct RecordingAdapter {
    calls: Mutex<Vec<Call>>,
    requests: Mutex<Vec<(PlayerHandle, PlayerRequest)>>,
    fail_prepare: AtomicBool,
    fail_start: AtomicBool,
    fail_stop: AtomicBool,
}

impl RecordingAdapter {
    pub fn fail_prepare(&self, fail: bool) {
        self.fail_prepare.store(fail, Ordering::SeqCst);
    }

    pub fn fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn fail_stop(&self, fail: bool) {
        self.fail_stop.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn requests(&self) -> Vec<(PlayerHandle, PlayerRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_handle(&self) -> PlayerHandle {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|(handle, _)| *handle)
            .expect("a player was prepared")
    }

    fn listener(&self, handle: PlayerHandle) -> Arc<dyn PlayerListener> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, request)| Arc::clone(&request.listener))
            .expect("known player")
    }

    /// Simulate the platform reaching the end of the source.
    pub fn finish(&self, handle: PlayerHandle) {
        self.listener(handle).on_completion();
    }

    /// Simulate a platform runtime error.
    pub fn fail(&self, handle: PlayerHandle, what: i32, extra: i32) {
        self.listener(handle).on_error(what, extra);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlaybackAdapter for RecordingAdapter {
    async fn prepare(&self, request: PlayerRequest) -> BridgeResult<PlayerHandle> {
        if self.fail_prepare.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("unsupported format".into()));
        }
        let handle = PlayerHandle::new();
        self.record(Call::Prepare(handle));
        self.requests.lock().unwrap().push((handle, request));
        Ok(handle)
    }

    async fn start(&self, player: PlayerHandle) -> BridgeResult<()> {
        self.record(Call::Start(player));
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("start failed".into()));
        }
        Ok(())
    }

    async fn seek_to_start(&self, player: PlayerHandle) -> BridgeResult<()> {
        self.record(Call::SeekToStart(player));
        Ok(())
    }

    async fn stop(&self, player: PlayerHandle) -> BridgeResult<()> {
        self.record(Call::Stop(player));
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("already stopped".into()));
        }
        Ok(())
    }

    async fn reset(&self, player: PlayerHandle) -> BridgeResult<()> {
        self.record(Call::Reset(player));
        Ok(())
    }

    async fn release(&self, player: PlayerHandle) -> BridgeResult<()> {
        self.record(Call::Release(player));
        Ok(())
    }
}

// ============================================================================
// Assets
// ============================================================================

/// Bundle containing a fixed set of asset stems.
pub struct StaticAssets(pub HashSet<&'static str>);

impl StaticAssets {
    pub fn with(names: &[&'static str]) -> Self {
        Self(names.iter().copied().collect())
    }
}

#[async_trait]
impl AssetResolver for StaticAssets {
    async fn resolve(&self, name: &str) -> BridgeResult<Option<AudioSource>> {
        let stem = bridge_traits::playback::asset_stem(name);
        Ok(self.0.contains(stem.as_str()).then(|| AudioSource::BundledAsset {
            location: PathBuf::from(format!("/assets/{}.mp3", stem)),
            name: stem,
        }))
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub controller: PlaybackController,
    pub adapter: Arc<RecordingAdapter>,
    pub fs: Arc<MemoryFs>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(http: MockHttp, assets: &[&'static str]) -> Harness {
    let clock = Arc::new(ManualClock::new(START_MS));
    let fs = Arc::new(MemoryFs::new(Arc::clone(&clock)));
    let adapter = Arc::new(RecordingAdapter::default());

    let config = PlayerConfig::builder()
        .playback_adapter(adapter.clone())
        .asset_resolver(Arc::new(StaticAssets::with(assets)))
        .http_client(Arc::new(http))
        .file_system(fs.clone())
        .clock(clock.clone())
        .build()
        .expect("valid config");

    Harness {
        controller: PlaybackController::from_config(&config),
        adapter,
        fs,
        clock,
    }
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
