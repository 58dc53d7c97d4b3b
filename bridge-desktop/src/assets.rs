//! Bundled asset lookup backed by a plain directory

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    playback::{asset_stem, AssetResolver, AudioSource},
};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Extensions probed, in order, when resolving an asset stem.
const ASSET_EXTENSIONS: [&str; 3] = ["mp3", "wav", "ogg"];

/// Resolves bundled sounds from a directory, the desktop counterpart of a
/// mobile app's raw resource folder.
///
/// `click`, `click.mp3` and `click.wav` all resolve to the first of
/// `click.mp3`, `click.wav`, `click.ogg` that exists.
pub struct DirectoryAssetResolver {
    root: PathBuf,
}

impl DirectoryAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetResolver for DirectoryAssetResolver {
    async fn resolve(&self, name: &str) -> Result<Option<AudioSource>> {
        let stem = asset_stem(name);
        if stem.is_empty() || stem.contains(['/', '\\']) || stem.starts_with('.') {
            debug!(name = %name, "Rejected asset name");
            return Ok(None);
        }

        for extension in ASSET_EXTENSIONS {
            let candidate = self.root.join(format!("{}.{}", stem, extension));
            if fs::try_exists(&candidate).await.map_err(BridgeError::Io)? {
                debug!(name = %name, path = ?candidate, "Resolved bundled asset");
                return Ok(Some(AudioSource::BundledAsset {
                    name: stem,
                    location: candidate,
                }));
            }
        }

        debug!(name = %name, root = ?self.root, "Bundled asset not found");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn asset_dir(files: &[&str]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ssp-assets-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).await.unwrap();
        for file in files {
            fs::write(dir.join(file), b"RIFF").await.unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn resolves_with_or_without_extension() {
        let dir = asset_dir(&["click.wav"]).await;
        let resolver = DirectoryAssetResolver::new(&dir);

        let bare = resolver.resolve("click").await.unwrap();
        let with_ext = resolver.resolve("click.mp3").await.unwrap();
        let expected = AudioSource::BundledAsset {
            name: "click".into(),
            location: dir.join("click.wav"),
        };
        assert_eq!(bare, Some(expected.clone()));
        assert_eq!(with_ext, Some(expected));

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn prefers_mp3_over_other_formats() {
        let dir = asset_dir(&["ding.ogg", "ding.mp3"]).await;
        let resolver = DirectoryAssetResolver::new(&dir);

        let source = resolver.resolve("ding").await.unwrap().unwrap();
        assert_eq!(source.path(), &dir.join("ding.mp3"));

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn missing_and_escaping_names_resolve_to_none() {
        let dir = asset_dir(&["click.mp3"]).await;
        let resolver = DirectoryAssetResolver::new(&dir);

        assert!(resolver.resolve("missing_asset").await.unwrap().is_none());
        assert!(resolver.resolve("../click").await.unwrap().is_none());
        assert!(resolver.resolve("").await.unwrap().is_none());

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
