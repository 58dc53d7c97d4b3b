//! Cache key derivation.

use core_runtime::config::{KeyAlgorithm, DEFAULT_KEY_PREFIX};
use sha2::{Digest, Sha256};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Maps source URLs to stable, file-name-safe cache keys.
///
/// Keys are `<prefix><hex digest>`; the digest covers the URL's UTF-8 bytes
/// exactly as given, so two spellings of the same resource get two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyDeriver {
    prefix: String,
    algorithm: KeyAlgorithm,
}

impl CacheKeyDeriver {
    pub fn new(prefix: impl Into<String>, algorithm: KeyAlgorithm) -> Self {
        Self {
            prefix: prefix.into(),
            algorithm,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Derive the cache key for `url`. Pure and deterministic across runs.
    pub fn derive_key(&self, url: &str) -> String {
        let digest = match self.algorithm {
            KeyAlgorithm::Sha256 => sha256_hex(url.as_bytes()),
            KeyAlgorithm::Fnv1a => fnv1a_hex(url.as_bytes()),
        };
        format!("{}{}", self.prefix, digest)
    }
}

impl Default for CacheKeyDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX, KeyAlgorithm::Sha256)
    }
}

/// Derive a key with the default prefix and SHA-256.
pub fn derive_key(url: &str) -> String {
    CacheKeyDeriver::default().derive_key(url)
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn fnv1a_hex(data: &[u8]) -> String {
    let hash = data.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    });
    format!("{:016x}", hash)
}
