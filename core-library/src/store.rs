//! Library store
//!
//! Owns the album and single collections and every mutation on them. Each
//! collection keeps the dense 1..N key invariant: additions take the next key
//! and removals renumber the survivors in iteration order.

use crate::collection::Collection;
use crate::error::{LibraryError, Result};
use crate::models::{Album, ItemKind, MusicEntry, Track};
use std::fmt;
use tracing::debug;

/// An item as handed to [`Library::add`] or returned by [`Library::delete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryItem {
    Album(Album),
    Track(Track),
}

impl LibraryItem {
    fn kind_name(&self) -> &'static str {
        match self {
            LibraryItem::Album(_) => "album",
            LibraryItem::Track(track) if track.is_single() => "single",
            LibraryItem::Track(_) => "song",
        }
    }

    pub fn as_entry(&self) -> &dyn MusicEntry {
        match self {
            LibraryItem::Album(album) => album,
            LibraryItem::Track(track) => track,
        }
    }
}

impl From<Album> for LibraryItem {
    fn from(album: Album) -> Self {
        LibraryItem::Album(album)
    }
}

impl From<Track> for LibraryItem {
    fn from(track: Track) -> Self {
        LibraryItem::Track(track)
    }
}

impl fmt::Display for LibraryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_entry().fmt(f)
    }
}

/// Mutable handle on the collection an [`ItemKind`] resolves to
pub enum CollectionMut<'a> {
    Albums(&'a mut Collection<Album>),
    Tracks(&'a mut Collection<Track>),
}

impl CollectionMut<'_> {
    pub fn len(&self) -> usize {
        match self {
            CollectionMut::Albums(c) => c.len(),
            CollectionMut::Tracks(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<u32> {
        match self {
            CollectionMut::Albums(c) => c.keys(),
            CollectionMut::Tracks(c) => c.keys(),
        }
    }

    pub fn contains_key(&self, key: u32) -> bool {
        match self {
            CollectionMut::Albums(c) => c.contains_key(key),
            CollectionMut::Tracks(c) => c.contains_key(key),
        }
    }

    pub fn reindex(&mut self) {
        match self {
            CollectionMut::Albums(c) => c.reindex(),
            CollectionMut::Tracks(c) => c.reindex(),
        }
    }

    fn remove(&mut self, key: u32) -> Option<LibraryItem> {
        match self {
            CollectionMut::Albums(c) => c.remove(key).map(LibraryItem::Album),
            CollectionMut::Tracks(c) => c.remove(key).map(LibraryItem::Track),
        }
    }
}

enum CollectionRef<'a> {
    Albums(&'a Collection<Album>),
    Tracks(&'a Collection<Track>),
}

/// Where a playable track lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackLocation {
    Single(u32),
    Song { album: u32, song: u32 },
}

impl fmt::Display for TrackLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackLocation::Single(key) => write!(f, "single {}", key),
            TrackLocation::Song { album, song } => write!(f, "album {} song {}", album, song),
        }
    }
}

/// The music library: albums with their songs, plus singles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    albums: Collection<Album>,
    singles: Collection<Track>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a library from already keyed collections.
    pub fn from_parts(albums: Collection<Album>, singles: Collection<Track>) -> Self {
        Self { albums, singles }
    }

    pub fn albums(&self) -> &Collection<Album> {
        &self.albums
    }

    pub fn singles(&self) -> &Collection<Track> {
        &self.singles
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty() && self.singles.is_empty()
    }

    /// Resolve the collection `kind` refers to.
    ///
    /// Songs live inside an album, so [`ItemKind::Song`] needs the key of an
    /// existing album and fails with [`LibraryError::InvalidAlbumKey`]
    /// otherwise. `album_key` is ignored for albums and singles.
    pub fn resolve_collection(
        &mut self,
        kind: ItemKind,
        album_key: Option<u32>,
    ) -> Result<CollectionMut<'_>> {
        match kind {
            ItemKind::Album => Ok(CollectionMut::Albums(&mut self.albums)),
            ItemKind::Single => Ok(CollectionMut::Tracks(&mut self.singles)),
            ItemKind::Song => {
                let album = album_key
                    .and_then(|key| self.albums.get_mut(key))
                    .ok_or(LibraryError::InvalidAlbumKey(album_key))?;
                Ok(CollectionMut::Tracks(&mut album.songs))
            }
        }
    }

    fn collection(&self, kind: ItemKind, album_key: Option<u32>) -> Result<CollectionRef<'_>> {
        match kind {
            ItemKind::Album => Ok(CollectionRef::Albums(&self.albums)),
            ItemKind::Single => Ok(CollectionRef::Tracks(&self.singles)),
            ItemKind::Song => {
                let album = album_key
                    .and_then(|key| self.albums.get(key))
                    .ok_or(LibraryError::InvalidAlbumKey(album_key))?;
                Ok(CollectionRef::Tracks(&album.songs))
            }
        }
    }

    /// Add `item` to the collection `kind` resolves to.
    ///
    /// Returns the assigned key, or `None` when an equal item is already
    /// present (nothing is changed in that case).
    pub fn add(
        &mut self,
        kind: ItemKind,
        item: impl Into<LibraryItem>,
        album_key: Option<u32>,
    ) -> Result<Option<u32>> {
        let item = item.into();
        let found = item.kind_name();
        let target = self.resolve_collection(kind, album_key)?;

        let key = match (target, item) {
            (CollectionMut::Albums(albums), LibraryItem::Album(album)) => {
                if albums.contains_value(&album) {
                    None
                } else {
                    Some(albums.insert_next(album).ok_or(LibraryError::KeysExhausted {
                        collection: kind.as_str(),
                    })?)
                }
            }
            (CollectionMut::Tracks(tracks), LibraryItem::Track(track))
                if kind == ItemKind::Song || track.is_single() =>
            {
                if tracks.contains_value(&track) {
                    None
                } else {
                    Some(tracks.insert_next(track).ok_or(LibraryError::KeysExhausted {
                        collection: kind.as_str(),
                    })?)
                }
            }
            _ => {
                return Err(LibraryError::KindMismatch {
                    expected: kind.as_str(),
                    found,
                })
            }
        };

        match key {
            Some(key) => debug!(%kind, key, ?album_key, "Added item"),
            None => debug!(%kind, ?album_key, "Skipped duplicate item"),
        }
        Ok(key)
    }

    /// Remove the entry under `key` and renumber the rest of its collection.
    ///
    /// An absent key is a no-op and returns `None`.
    pub fn delete(
        &mut self,
        kind: ItemKind,
        key: u32,
        album_key: Option<u32>,
    ) -> Result<Option<LibraryItem>> {
        let mut target = self.resolve_collection(kind, album_key)?;
        let removed = target.remove(key);
        if removed.is_some() {
            debug!(%kind, key, ?album_key, remaining = target.len(), "Deleted item");
        }
        Ok(removed)
    }

    /// Renumber a collection 1..N in its current iteration order.
    pub fn reindex(&mut self, kind: ItemKind, album_key: Option<u32>) -> Result<()> {
        self.resolve_collection(kind, album_key)?.reindex();
        Ok(())
    }

    /// `(key, item)` pairs in ascending key order.
    pub fn list(
        &self,
        kind: ItemKind,
        album_key: Option<u32>,
    ) -> Result<Box<dyn Iterator<Item = (u32, &dyn MusicEntry)> + '_>> {
        let entries: Box<dyn Iterator<Item = (u32, &dyn MusicEntry)> + '_> =
            match self.collection(kind, album_key)? {
                CollectionRef::Albums(c) => {
                    Box::new(c.iter().map(|(key, album)| (key, album as &dyn MusicEntry)))
                }
                CollectionRef::Tracks(c) => {
                    Box::new(c.iter().map(|(key, track)| (key, track as &dyn MusicEntry)))
                }
            };
        Ok(entries)
    }

    pub fn len(&self, kind: ItemKind, album_key: Option<u32>) -> Result<usize> {
        Ok(match self.collection(kind, album_key)? {
            CollectionRef::Albums(c) => c.len(),
            CollectionRef::Tracks(c) => c.len(),
        })
    }

    pub fn contains(&self, kind: ItemKind, key: u32, album_key: Option<u32>) -> Result<bool> {
        Ok(match self.collection(kind, album_key)? {
            CollectionRef::Albums(c) => c.contains_key(key),
            CollectionRef::Tracks(c) => c.contains_key(key),
        })
    }

    pub fn add_album(&mut self, album: Album) -> Result<Option<u32>> {
        self.add(ItemKind::Album, album, None)
    }

    pub fn add_song(&mut self, album_key: u32, song: Track) -> Result<Option<u32>> {
        self.add(ItemKind::Song, song, Some(album_key))
    }

    pub fn add_single(&mut self, single: Track) -> Result<Option<u32>> {
        self.add(ItemKind::Single, single, None)
    }

    pub fn album(&self, key: u32) -> Option<&Album> {
        self.albums.get(key)
    }

    pub fn album_mut(&mut self, key: u32) -> Option<&mut Album> {
        self.albums.get_mut(key)
    }

    pub fn single(&self, key: u32) -> Option<&Track> {
        self.singles.get(key)
    }

    pub fn track(&self, location: TrackLocation) -> Option<&Track> {
        match location {
            TrackLocation::Single(key) => self.singles.get(key),
            TrackLocation::Song { album, song } => self.albums.get(album)?.songs.get(song),
        }
    }

    pub fn track_mut(&mut self, location: TrackLocation) -> Option<&mut Track> {
        match location {
            TrackLocation::Single(key) => self.singles.get_mut(key),
            TrackLocation::Song { album, song } => {
                self.albums.get_mut(album)?.songs.get_mut(song)
            }
        }
    }

    /// Mark every album, song and single as not playing.
    pub fn clear_playing_flags(&mut self) {
        for album in self.albums.values_mut() {
            album.meta.currently_playing = false;
            for song in album.songs.values_mut() {
                song.meta.currently_playing = false;
            }
        }
        for single in self.singles.values_mut() {
            single.meta.currently_playing = false;
        }
    }

    /// Number of items flagged as playing, across the whole library.
    pub fn playing_count(&self) -> usize {
        let albums = self.albums.values().filter(|a| a.is_playing()).count();
        let songs: usize = self
            .albums
            .values()
            .map(|a| a.songs.values().filter(|s| s.is_playing()).count())
            .sum();
        let singles = self.singles.values().filter(|s| s.is_playing()).count();
        albums + songs + singles
    }
}
