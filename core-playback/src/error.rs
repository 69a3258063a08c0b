//! # Playback Error Types
//!
//! Every playback failure is recoverable: the sequencer is left in a
//! consistent mode and the caller only has to report the condition.

use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The track has no audio file recorded.
    #[error("Requested song '{name}' could not be found")]
    NotFound { name: String },

    /// A track location no longer resolves (e.g. its album was deleted).
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    // ========================================================================
    // Device Errors
    // ========================================================================
    /// The audio device could not load the file.
    #[error("Error loading {path}: {reason}")]
    LoadError { path: String, reason: String },

    /// The audio device could not start the loaded file.
    #[error("Error playing {path}: {reason}")]
    PlayError { path: String, reason: String },

    // ========================================================================
    // Album Errors
    // ========================================================================
    /// Album playback was requested for an album without songs.
    #[error("The album {album} is currently empty")]
    EmptyCollection { album: String },

    /// Album playback was requested for a key with no album.
    #[error("Album with key {0} is invalid")]
    InvalidAlbumKey(u32),

    /// `next` was called while no album is being played.
    #[error("No album is playing")]
    NoAlbumActive,
}

impl PlaybackError {
    /// Returns `true` if the audio device reported the failure.
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::LoadError { .. } | PlaybackError::PlayError { .. }
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
