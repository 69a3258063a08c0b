//! Playback sequencer
//!
//! A small state machine deciding what the single audio stream plays:
//!
//! ```text
//! Idle ──play_single_or_track──▶ PlayingSingle
//! Idle ──play_album────────────▶ PlayingAlbum(cursor = 0)
//! PlayingAlbum ──next (in range)────▶ PlayingAlbum(cursor + 1)
//! PlayingAlbum ──next (out of range)▶ Idle
//! any ──stop_all───────────────▶ Idle
//! ```
//!
//! The device is always stopped before a new file is loaded, and the
//! library's `currently_playing` flags are kept in step with the mode: at
//! most one track is flagged, and only once the device accepted it.

use crate::error::{PlaybackError, Result};
use bridge_traits::playback::AudioDevice;
use core_library::{Library, Track, TrackLocation};
use core_runtime::logging::strip_path;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// What the sequencer is currently doing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Idle,
    /// One single or album song, played on its own
    PlayingSingle(TrackLocation),
    /// An album traversal over its song keys in ascending order
    PlayingAlbum {
        album_key: u32,
        ordered_keys: Vec<u32>,
        cursor: usize,
    },
}

/// Outcome of a successful sequencer operation, for the front end to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackNotice {
    NowPlaying { name: String, artist: String },
    /// The song at the album cursor has no file; playback did not advance
    Skipped { name: String },
    AlbumFinished { album: String },
    /// Audio was playing and has been stopped
    Stopped,
    /// Nothing was playing
    Idle,
}

impl fmt::Display for PlaybackNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackNotice::NowPlaying { name, artist } => {
                write!(f, "Now playing {} by {}...", name, artist)
            }
            PlaybackNotice::Skipped { name } => {
                write!(f, "Song {} is missing a file, skipping.", name)
            }
            PlaybackNotice::AlbumFinished { album } => {
                write!(f, "Album {} has finished playing.", album)
            }
            PlaybackNotice::Stopped => f.write_str("Music stopped..."),
            PlaybackNotice::Idle => f.write_str("Nothing is playing."),
        }
    }
}

/// Drives an [`AudioDevice`] through single and album playback
pub struct PlaybackSequencer<D: AudioDevice> {
    device: D,
    mode: PlaybackMode,
}

impl<D: AudioDevice> PlaybackSequencer<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            mode: PlaybackMode::Idle,
        }
    }

    pub fn mode(&self) -> &PlaybackMode {
        &self.mode
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn is_idle(&self) -> bool {
        self.mode == PlaybackMode::Idle
    }

    /// Location of the track the mode points at, if any.
    pub fn current_location(&self) -> Option<TrackLocation> {
        match &self.mode {
            PlaybackMode::Idle => None,
            PlaybackMode::PlayingSingle(location) => Some(*location),
            PlaybackMode::PlayingAlbum {
                album_key,
                ordered_keys,
                cursor,
            } => ordered_keys.get(*cursor).map(|song| TrackLocation::Song {
                album: *album_key,
                song: *song,
            }),
        }
    }

    /// The track the mode points at, looked up in `library`.
    pub fn current_track<'a>(&self, library: &'a Library) -> Option<&'a Track> {
        library.track(self.current_location()?)
    }

    /// Play one single or album song, replacing whatever was playing.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::TrackNotFound`] if `location` does not resolve
    /// - [`PlaybackError::NotFound`] if the track has no file
    /// - [`PlaybackError::LoadError`] / [`PlaybackError::PlayError`] from the
    ///   device
    ///
    /// The sequencer is idle after any error.
    pub fn play_single_or_track(
        &mut self,
        library: &mut Library,
        location: TrackLocation,
    ) -> Result<PlaybackNotice> {
        self.stop_all(library);

        let track = library
            .track(location)
            .ok_or_else(|| PlaybackError::TrackNotFound(location.to_string()))?;
        if !track.has_file() {
            warn!(%location, name = %track.name(), "Track has no audio file");
            return Err(PlaybackError::NotFound {
                name: track.name().to_string(),
            });
        }

        let notice = now_playing(track);
        let path = track.file_path.clone();
        self.start(Path::new(&path))?;

        self.mark_playing(library, location)?;
        self.mode = PlaybackMode::PlayingSingle(location);
        info!(%location, file = %strip_path(&path), "Playing track");
        Ok(notice)
    }

    /// Play an album from its lowest song key.
    ///
    /// An unknown or empty album is reported without touching the current
    /// playback.
    pub fn play_album(&mut self, library: &mut Library, album_key: u32) -> Result<PlaybackNotice> {
        let album = library
            .album(album_key)
            .ok_or(PlaybackError::InvalidAlbumKey(album_key))?;
        if album.songs.is_empty() {
            return Err(PlaybackError::EmptyCollection {
                album: album.to_string(),
            });
        }
        let ordered_keys = album.songs.keys();

        self.stop_all(library);
        debug!(album_key, songs = ordered_keys.len(), "Starting album");
        self.mode = PlaybackMode::PlayingAlbum {
            album_key,
            ordered_keys,
            cursor: 0,
        };
        self.advance_to_cursor(library)
    }

    /// Load and play the album song under the cursor.
    ///
    /// A song without a file is reported as [`PlaybackNotice::Skipped`] and
    /// the cursor stays put; `next` moves past it. A device error leaves the
    /// mode as it is, so `next` can also move past a song that fails to play.
    pub fn advance_to_cursor(&mut self, library: &mut Library) -> Result<PlaybackNotice> {
        if !matches!(self.mode, PlaybackMode::PlayingAlbum { .. }) {
            return Err(PlaybackError::NoAlbumActive);
        }
        let Some(location) = self.current_location() else {
            return Err(self.lost_track(library, "album cursor out of range".to_string()));
        };

        let Some(track) = library.track(location) else {
            return Err(self.lost_track(library, location.to_string()));
        };
        if !track.has_file() {
            info!(%location, name = %track.name(), "Album song has no audio file, skipping");
            return Ok(PlaybackNotice::Skipped {
                name: track.name().to_string(),
            });
        }

        let notice = now_playing(track);
        let path = track.file_path.clone();
        if self.device.is_busy() {
            self.device.stop();
        }
        self.start(Path::new(&path))?;

        self.mark_playing(library, location)?;
        info!(%location, file = %strip_path(&path), "Playing album song");
        Ok(notice)
    }

    /// Move to the next album song, finishing the album after the last one.
    pub fn next(&mut self, library: &mut Library) -> Result<PlaybackNotice> {
        let current = self.current_location();
        let PlaybackMode::PlayingAlbum {
            album_key,
            ordered_keys,
            cursor,
        } = &mut self.mode
        else {
            return Err(PlaybackError::NoAlbumActive);
        };

        if let Some(track) = current.and_then(|location| library.track_mut(location)) {
            track.meta.currently_playing = false;
        }
        *cursor += 1;

        if *cursor < ordered_keys.len() {
            return self.advance_to_cursor(library);
        }

        let album = library
            .album(*album_key)
            .map(|album| album.name().to_string())
            .unwrap_or_else(|| format!("#{}", album_key));
        info!(album = %album, "Album finished");
        self.stop_all(library);
        Ok(PlaybackNotice::AlbumFinished { album })
    }

    /// Stop the device if it is busy, clear every playing flag in the
    /// library and return to idle.
    pub fn stop_all(&mut self, library: &mut Library) -> PlaybackNotice {
        let was_busy = self.device.is_busy();
        if was_busy {
            self.device.stop();
            debug!("Stopped audio device");
        }
        library.clear_playing_flags();
        self.mode = PlaybackMode::Idle;

        if was_busy {
            PlaybackNotice::Stopped
        } else {
            PlaybackNotice::Idle
        }
    }

    fn start(&mut self, path: &Path) -> Result<()> {
        self.device.load(path).map_err(|e| {
            warn!(file = %strip_path(&path.to_string_lossy()), error = %e, "Device failed to load file");
            PlaybackError::LoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        self.device.play().map_err(|e| {
            warn!(file = %strip_path(&path.to_string_lossy()), error = %e, "Device failed to play file");
            PlaybackError::PlayError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn mark_playing(&mut self, library: &mut Library, location: TrackLocation) -> Result<()> {
        match library.track_mut(location) {
            Some(track) => {
                track.meta.currently_playing = true;
                Ok(())
            }
            None => Err(self.lost_track(library, location.to_string())),
        }
    }

    fn lost_track(&mut self, library: &mut Library, what: String) -> PlaybackError {
        warn!(what = %what, "Playing track no longer exists, stopping");
        self.stop_all(library);
        PlaybackError::TrackNotFound(what)
    }
}

fn now_playing(track: &Track) -> PlaybackNotice {
    PlaybackNotice::NowPlaying {
        name: track.name().to_string(),
        artist: track.artist().to_string(),
    }
}
