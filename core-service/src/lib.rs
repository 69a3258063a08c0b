//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided bridges (file system, audio device)
//! into the library, persistence and playback crates. Desktop apps typically
//! enable the `desktop-shims` feature (which depends on `bridge-desktop`) and,
//! for real audio output, `rodio-output`.
//!
//! The service is the single owner of the library: every mutation goes
//! through it, is saved right away when `autosave` is on, and never leaves
//! the sequencer pointing at a key that was renumbered.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{playback::AudioDevice, storage::FileSystemAccess};
use core_library::{
    Album, ItemKind, Library, LibraryError, LibraryItem, LibraryPersistence, Track, TrackLocation,
};
use core_playback::{PlaybackMode, PlaybackNotice, PlaybackSequencer};
use core_runtime::CoreConfig;
use tracing::{debug, info, warn};

#[cfg(feature = "desktop-shims")]
use bridge_desktop::StdFileSystem;
#[cfg(feature = "rodio-output")]
use bridge_desktop::RodioAudioDevice;

/// Primary façade exposed to host applications.
pub struct MusicLibraryService<D: AudioDevice> {
    config: CoreConfig,
    library: Library,
    persistence: LibraryPersistence,
    sequencer: PlaybackSequencer<D>,
    startup_condition: Option<LibraryError>,
}

impl<D: AudioDevice> MusicLibraryService<D> {
    /// Load the library named by `config` and get ready to play on `device`.
    ///
    /// A missing library document is not fatal: the service starts empty
    /// and the condition is kept for [`take_startup_condition`](Self::take_startup_condition).
    pub fn open(config: CoreConfig, fs: Arc<dyn FileSystemAccess>, device: D) -> Result<Self> {
        config.validate()?;

        let persistence = LibraryPersistence::from_config(fs, &config);
        let loaded = persistence.load()?;
        info!(
            path = ?config.database_path,
            autosave = config.autosave,
            recovered = loaded.condition.is_some(),
            "Music library service ready"
        );

        Ok(Self {
            config,
            library: loaded.library,
            persistence,
            sequencer: PlaybackSequencer::new(device),
            startup_condition: loaded.condition,
        })
    }

    /// The recoverable condition met while loading, reported once.
    pub fn take_startup_condition(&mut self) -> Option<LibraryError> {
        self.startup_condition.take()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// `(key, rendered item)` pairs in ascending key order.
    pub fn list(&self, kind: ItemKind, album_key: Option<u32>) -> Result<Vec<(u32, String)>> {
        Ok(self
            .library
            .list(kind, album_key)?
            .map(|(key, item)| (key, item.to_string()))
            .collect())
    }

    pub fn playback_mode(&self) -> &PlaybackMode {
        self.sequencer.mode()
    }

    pub fn now_playing(&self) -> Option<&Track> {
        self.sequencer.current_track(&self.library)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Add an album. Returns its key, or `None` if it already exists.
    pub fn add_album(
        &mut self,
        name: &str,
        artist: &str,
        release_date: &str,
    ) -> Result<Option<u32>> {
        let key = self
            .library
            .add(ItemKind::Album, Album::new(name, artist, release_date), None)?;
        self.after_mutation(key.is_some())?;
        Ok(key)
    }

    /// Add a song to the album under `album_key`.
    ///
    /// The song records the album's current name as its owner.
    pub fn add_song(
        &mut self,
        album_key: u32,
        name: &str,
        artist: &str,
        release_date: &str,
        file_path: &str,
    ) -> Result<Option<u32>> {
        let song = self
            .library
            .album(album_key)
            .ok_or(LibraryError::InvalidAlbumKey(Some(album_key)))?
            .new_song(name, artist, release_date, file_path);

        let key = self.library.add_song(album_key, song)?;
        self.after_mutation(key.is_some())?;
        Ok(key)
    }

    pub fn add_single(
        &mut self,
        name: &str,
        artist: &str,
        release_date: &str,
        file_path: &str,
    ) -> Result<Option<u32>> {
        let single = Track::single(name, artist, release_date, file_path);
        let key = self.library.add_single(single)?;
        self.after_mutation(key.is_some())?;
        Ok(key)
    }

    /// Delete an item and renumber its collection.
    ///
    /// Playback is stopped before anything is removed. Deleting an absent
    /// key changes nothing and keeps playback running.
    pub fn delete(
        &mut self,
        kind: ItemKind,
        key: u32,
        album_key: Option<u32>,
    ) -> Result<Option<LibraryItem>> {
        if !self.library.contains(kind, key, album_key)? {
            debug!(%kind, key, ?album_key, "Nothing to delete");
            return Ok(None);
        }

        self.sequencer.stop_all(&mut self.library);
        let removed = self.library.delete(kind, key, album_key)?;
        self.after_mutation(removed.is_some())?;
        Ok(removed)
    }

    /// Write the library now, whatever the autosave setting.
    pub fn save(&self) -> Result<()> {
        self.persistence.save(&self.library)?;
        Ok(())
    }

    fn after_mutation(&self, changed: bool) -> Result<()> {
        if changed && self.config.autosave {
            if let Err(err) = self.persistence.save(&self.library) {
                warn!(error = %err, "Autosave failed; change kept in memory");
                return Err(err.into());
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    pub fn play_song(&mut self, album_key: u32, song_key: u32) -> Result<PlaybackNotice> {
        if self.library.album(album_key).is_none() {
            return Err(LibraryError::InvalidAlbumKey(Some(album_key)).into());
        }
        let location = TrackLocation::Song {
            album: album_key,
            song: song_key,
        };
        Ok(self
            .sequencer
            .play_single_or_track(&mut self.library, location)?)
    }

    pub fn play_single(&mut self, key: u32) -> Result<PlaybackNotice> {
        Ok(self
            .sequencer
            .play_single_or_track(&mut self.library, TrackLocation::Single(key))?)
    }

    pub fn play_album(&mut self, album_key: u32) -> Result<PlaybackNotice> {
        Ok(self.sequencer.play_album(&mut self.library, album_key)?)
    }

    pub fn next(&mut self) -> Result<PlaybackNotice> {
        Ok(self.sequencer.next(&mut self.library)?)
    }

    pub fn stop(&mut self) -> PlaybackNotice {
        self.sequencer.stop_all(&mut self.library)
    }

    /// Stop playback and hand back the device.
    pub fn close(mut self) -> D {
        self.sequencer.stop_all(&mut self.library);
        debug!("Music library service closed");
        self.sequencer.into_device()
    }
}

#[cfg(feature = "desktop-shims")]
impl<D: AudioDevice> MusicLibraryService<D> {
    /// Open with `std::fs` storage; relative database paths resolve against
    /// the working directory.
    pub fn open_desktop(config: CoreConfig, device: D) -> Result<Self> {
        Self::open(config, Arc::new(StdFileSystem::new()), device)
    }
}

#[cfg(feature = "rodio-output")]
impl MusicLibraryService<RodioAudioDevice> {
    /// Open with `std::fs` storage and the system's default audio output.
    pub fn open_default(config: CoreConfig) -> Result<Self> {
        let device = RodioAudioDevice::open_default()
            .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;
        Self::open_desktop(config, device)
    }
}
