//! Domain models for the music library
//!
//! Albums, album songs and singles share the [`MusicItem`] attributes and the
//! [`MusicEntry`] capability (render, record conversion). Songs and singles
//! are the same [`Track`] type distinguished by a [`TrackVariant`] tag.

use crate::collection::Collection;
use crate::error::{LibraryError, Result};
use crate::record::{ItemRecord, RecordMap, ALBUM_TAG, SINGLE_TAG, SONG_TAG};
use std::fmt;
use std::str::FromStr;

/// Owning album name recorded on every single.
pub const SINGLE_ALBUM_NAME: &str = "Single";

// =============================================================================
// Shared attributes
// =============================================================================

/// Attributes common to every playable item
///
/// Equality ignores `currently_playing`: two items describing the same
/// release are the same item whether or not one of them is playing.
#[derive(Debug, Clone, Default)]
pub struct MusicItem {
    pub name: String,
    pub artist: String,
    pub release_date: String,
    /// Runtime playback flag, never persisted
    pub currently_playing: bool,
}

impl MusicItem {
    pub fn new(
        name: impl Into<String>,
        artist: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            release_date: release_date.into(),
            currently_playing: false,
        }
    }

    fn from_record(record: &ItemRecord) -> Self {
        Self::new(&record.name, &record.artist, &record.release_date)
    }

    fn to_record(&self, tag: &str) -> ItemRecord {
        ItemRecord {
            name: self.name.clone(),
            artist: self.artist.clone(),
            release_date: self.release_date.clone(),
            music_item_type: Some(tag.to_string()),
            album: None,
            file_name: None,
            songs: None,
        }
    }
}

impl PartialEq for MusicItem {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.artist == other.artist
            && self.release_date == other.release_date
    }
}

impl Eq for MusicItem {}

impl fmt::Display for MusicItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.name, self.artist, self.release_date)
    }
}

/// Capability shared by albums, songs and singles
pub trait MusicEntry: fmt::Display {
    fn meta(&self) -> &MusicItem;

    fn meta_mut(&mut self) -> &mut MusicItem;

    /// Variant name written as `music_item_type`.
    fn tag(&self) -> &'static str;

    /// Flat storage record tagged with [`tag`](Self::tag).
    fn to_record(&self) -> ItemRecord;

    /// Rebuild from a storage record; `currently_playing` starts false.
    fn from_record(record: ItemRecord) -> Result<Self>
    where
        Self: Sized;

    fn is_playing(&self) -> bool {
        self.meta().currently_playing
    }
}

// =============================================================================
// Tracks
// =============================================================================

/// Whether a track is an album song or a standalone single
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackVariant {
    Song,
    Single,
}

impl TrackVariant {
    pub fn tag(self) -> &'static str {
        match self {
            TrackVariant::Song => SONG_TAG,
            TrackVariant::Single => SINGLE_TAG,
        }
    }
}

/// A song inside an album, or a single
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub meta: MusicItem,
    /// Name of the owning album at creation time; `"Single"` for singles
    pub album: String,
    /// Audio file location; empty when no file was given
    pub file_path: String,
    pub variant: TrackVariant,
}

impl Track {
    /// A song belonging to `album`.
    pub fn song(
        name: impl Into<String>,
        artist: impl Into<String>,
        release_date: impl Into<String>,
        album: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            meta: MusicItem::new(name, artist, release_date),
            album: album.into(),
            file_path: file_path.into(),
            variant: TrackVariant::Song,
        }
    }

    /// A standalone single.
    pub fn single(
        name: impl Into<String>,
        artist: impl Into<String>,
        release_date: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            meta: MusicItem::new(name, artist, release_date),
            album: SINGLE_ALBUM_NAME.to_string(),
            file_path: file_path.into(),
            variant: TrackVariant::Single,
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn artist(&self) -> &str {
        &self.meta.artist
    }

    pub fn is_single(&self) -> bool {
        self.variant == TrackVariant::Single
    }

    /// Whether a file location was recorded.
    pub fn has_file(&self) -> bool {
        !self.file_path.trim().is_empty()
    }

    /// Rebuild a song record found inside `album_name`.
    ///
    /// A record without an `album` field belongs to the album it is stored in.
    pub fn from_song_record(record: ItemRecord, album_name: &str) -> Result<Self> {
        let mut track = Self::from_record(record)?;
        if track.album.is_empty() {
            track.album = album_name.to_string();
        }
        Ok(track)
    }

    /// Rebuild a record found in the singles section.
    ///
    /// Whatever its tag says, a record stored there is a single and belongs
    /// to the `"Single"` album. Only an album tag is refused.
    pub fn from_single_record(record: ItemRecord) -> Result<Self> {
        if record.tag() == Some(ALBUM_TAG) {
            return Err(LibraryError::KindMismatch {
                expected: SINGLE_TAG,
                found: ALBUM_TAG,
            });
        }
        Ok(Self::single(
            record.name,
            record.artist,
            record.release_date,
            record.file_name.unwrap_or_default(),
        ))
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.meta.fmt(f)
    }
}

impl MusicEntry for Track {
    fn meta(&self) -> &MusicItem {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MusicItem {
        &mut self.meta
    }

    fn tag(&self) -> &'static str {
        self.variant.tag()
    }

    fn to_record(&self) -> ItemRecord {
        let mut record = self.meta.to_record(self.tag());
        record.album = Some(self.album.clone());
        record.file_name = Some(self.file_path.clone());
        record
    }

    fn from_record(record: ItemRecord) -> Result<Self> {
        let meta = MusicItem::from_record(&record);
        let variant = match record.tag() {
            Some(SINGLE_TAG) => TrackVariant::Single,
            Some(ALBUM_TAG) => {
                return Err(LibraryError::KindMismatch {
                    expected: SONG_TAG,
                    found: ALBUM_TAG,
                })
            }
            _ => TrackVariant::Song,
        };
        let album = match variant {
            TrackVariant::Single => SINGLE_ALBUM_NAME.to_string(),
            TrackVariant::Song => record.album.unwrap_or_default(),
        };

        Ok(Self {
            meta,
            album,
            file_path: record.file_name.unwrap_or_default(),
            variant,
        })
    }
}

// =============================================================================
// Albums
// =============================================================================

/// An album and its songs, keyed 1..N
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub meta: MusicItem,
    pub songs: Collection<Track>,
}

impl Album {
    pub fn new(
        name: impl Into<String>,
        artist: impl Into<String>,
        release_date: impl Into<String>,
    ) -> Self {
        Self {
            meta: MusicItem::new(name, artist, release_date),
            songs: Collection::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// A new song owned by this album.
    pub fn new_song(
        &self,
        name: impl Into<String>,
        artist: impl Into<String>,
        release_date: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Track {
        Track::song(name, artist, release_date, self.name(), file_path)
    }

    /// Rebuild from a record, choosing how the nested song keys are read.
    ///
    /// With `compact_keys` the songs are ordered by key and renumbered 1..N;
    /// otherwise their stored keys are kept and repeats are rejected.
    pub fn from_record_with(record: ItemRecord, compact_keys: bool) -> Result<Self> {
        match record.tag() {
            None | Some(ALBUM_TAG) => {}
            Some(SINGLE_TAG) => {
                return Err(LibraryError::KindMismatch {
                    expected: ALBUM_TAG,
                    found: SINGLE_TAG,
                })
            }
            Some(SONG_TAG) => {
                return Err(LibraryError::KindMismatch {
                    expected: ALBUM_TAG,
                    found: SONG_TAG,
                })
            }
            Some(other) => {
                return Err(LibraryError::invalid_record(
                    "music_item_type",
                    format!("unknown item type '{}'", other),
                ))
            }
        }

        let meta = MusicItem::from_record(&record);
        let section = format!("albums.{}.songs", meta.name);
        let songs = record
            .songs
            .unwrap_or_default()
            .into_keyed(&section)?
            .into_iter()
            .map(|(key, song)| -> Result<(u32, Track)> {
                Ok((key, Track::from_song_record(song, &meta.name)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let songs = if compact_keys {
            Collection::compacted(songs)
        } else {
            Collection::try_from_entries(songs).map_err(|key| {
                LibraryError::invalid_record(section, format!("duplicate key {}", key))
            })?
        };

        Ok(Self { meta, songs })
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.meta.fmt(f)
    }
}

impl MusicEntry for Album {
    fn meta(&self) -> &MusicItem {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MusicItem {
        &mut self.meta
    }

    fn tag(&self) -> &'static str {
        ALBUM_TAG
    }

    fn to_record(&self) -> ItemRecord {
        let mut songs = RecordMap::default();
        for (key, song) in self.songs.iter() {
            songs.push(key, song.to_record());
        }

        let mut record = self.meta.to_record(ALBUM_TAG);
        record.songs = Some(songs);
        record
    }

    fn from_record(record: ItemRecord) -> Result<Self> {
        Self::from_record_with(record, true)
    }
}

// =============================================================================
// Item kinds
// =============================================================================

/// Which collection an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Songs of one album; operations need an album key
    Song,
    Album,
    Single,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Song => "song",
            ItemKind::Album => "album",
            ItemKind::Single => "single",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "song" | "songs" => Ok(ItemKind::Song),
            "album" | "albums" => Ok(ItemKind::Album),
            "single" | "singles" => Ok(ItemKind::Single),
            other => Err(LibraryError::invalid_record(
                "item_kind",
                format!("unknown item kind '{}'", other),
            )),
        }
    }
}
