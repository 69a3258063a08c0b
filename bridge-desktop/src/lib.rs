//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `FileSystemAccess` using `std::fs`, with atomic document replacement
//! - `AudioDevice` using `rodio` (behind the `rodio-output` feature)
//!
//! ## Feature Flags
//!
//! - `rodio-output`: Enable audio output through the system's default device.
//!   Off by default because it links against the platform audio libraries
//!   (ALSA on Linux).
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{RodioAudioDevice, StdFileSystem};
//!
//! let fs = StdFileSystem::new();
//! let device = RodioAudioDevice::open_default()?;
//! // Hand both to core-service
//! ```

mod filesystem;

#[cfg(feature = "rodio-output")]
mod audio;

pub use filesystem::StdFileSystem;

#[cfg(feature = "rodio-output")]
pub use audio::RodioAudioDevice;
