//! # Host Bridge Traits
//!
//! Capability traits the music library core requires from its host.
//!
//! ## Overview
//!
//! The core never talks to the sound card or the disk directly. Each trait in
//! this crate describes one capability that a host (desktop app, test harness)
//! injects at construction time:
//!
//! - [`AudioDevice`](playback::AudioDevice) - A single-stream audio output
//!   (`load`, `play`, `stop`, `is_busy`)
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Whole-document reads and
//!   writes used by the persistence adapter
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it and keep the original message, since
//! the core surfaces it verbatim to the user.
//!
//! ## Threading
//!
//! The core is single-threaded and synchronous. `AudioDevice` is driven through
//! `&mut self`; implementations may run their own playback thread internally,
//! which the core only observes through `is_busy()`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::playback::AudioDevice;
//! use std::path::Path;
//!
//! fn start(device: &mut dyn AudioDevice) -> bridge_traits::error::Result<()> {
//!     if device.is_busy() {
//!         device.stop();
//!     }
//!     device.load(Path::new("song.mp3"))?;
//!     device.play()
//! }
//! ```

pub mod error;
pub mod playback;
pub mod storage;
pub mod logging;

pub use error::BridgeError;

// Re-export commonly used types
pub use playback::AudioDevice;
pub use storage::FileSystemAccess;
pub use logging::{LogEntry, LogLevel, LoggerSink};
