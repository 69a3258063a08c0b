//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-service`, `core-library`, `core-playback`). Host
//! applications can depend on `music-library-workspace` and enable the
//! documented features without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(any(feature = "library-only", feature = "playback"))]
pub use core_library as library;

#[cfg(feature = "playback")]
pub use core_playback as playback;
