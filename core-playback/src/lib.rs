//! # Playback Module
//!
//! Sequences playback of library tracks over a single audio stream.
//!
//! ## Overview
//!
//! This module handles:
//! - Playing one single or album song on demand
//! - Album traversal in ascending song-key order with `next`
//! - Keeping the library's `currently_playing` flags in step with the device
//!
//! The audio device is injected through [`bridge_traits::AudioDevice`], so
//! the sequencer never touches decoding or output itself.

pub mod error;
pub mod sequencer;

pub use error::{PlaybackError, Result};
pub use sequencer::{PlaybackMode, PlaybackNotice, PlaybackSequencer};
