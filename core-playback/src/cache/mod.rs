//! # Sound Download Cache
//!
//! Remote sounds are downloaded once and kept as plain files in a dedicated
//! cache subdirectory until they exceed the caller's TTL.
//!
//! ## Components
//!
//! - [`CacheKeyDeriver`] - URL to `<prefix><hex digest>` key
//! - [`CacheStore`] - lookup with expiry, atomic writes, purge and clear
//! - [`RemoteSourceCache`] - lookup, else download and write
//!
//! ## On-disk layout
//!
//! ```text
//! <app cache dir>/SimpleSoundPlayer/
//!     audio_3f1c…e9.mp3          fresh or stale payload
//!     audio_3f1c…e9.mp3.part-…   write in progress (ignored by lookup)
//! ```

mod key;
mod remote;
mod store;

pub use key::{derive_key, CacheKeyDeriver};
pub use remote::RemoteSourceCache;
pub use store::CacheStore;
