//! Simple sound player workspace crate.
//!
//! Re-exports the workspace crates behind feature flags so host applications
//! depend on one crate: `desktop-shims` (default) wires reqwest downloads and
//! a tokio file cache, `headless` leaves every bridge to the host.

#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use core_playback as playback;
#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use core_runtime as runtime;
#[cfg(any(feature = "desktop-shims", feature = "headless"))]
pub use core_service::*;
