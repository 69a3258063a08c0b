//! Storage records
//!
//! The flat, tagged shape items take in the library document:
//!
//! ```json
//! {
//!     "albums": {
//!         "1": {
//!             "name": "Blue Train",
//!             "artist": "John Coltrane",
//!             "release_date": "1957",
//!             "music_item_type": "Album",
//!             "songs": {
//!                 "1": {
//!                     "name": "Moment's Notice",
//!                     "artist": "John Coltrane",
//!                     "release_date": "1957",
//!                     "music_item_type": "Song",
//!                     "album": "Blue Train",
//!                     "file_name": "moments_notice.mp3"
//!                 }
//!             }
//!         }
//!     },
//!     "singles": {}
//! }
//! ```

use crate::error::{LibraryError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const SONG_TAG: &str = "Song";
pub const SINGLE_TAG: &str = "Single";
pub const ALBUM_TAG: &str = "Album";

/// One stored item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub artist: String,
    pub release_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub songs: Option<RecordMap>,
}

impl ItemRecord {
    pub fn tag(&self) -> Option<&str> {
        self.music_item_type.as_deref()
    }
}

/// String-keyed records in document order
///
/// JSON objects are unordered in general, but the library document's key
/// order is meaningful when keys are trusted as-is, so this map keeps the
/// order entries appear in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMap(pub Vec<(String, ItemRecord)>);

impl RecordMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, key: u32, record: ItemRecord) {
        self.0.push((key.to_string(), record));
    }

    /// Entries with their keys parsed as positive integers.
    ///
    /// `section` names the enclosing map in error messages.
    pub fn into_keyed(self, section: &str) -> Result<Vec<(u32, ItemRecord)>> {
        self.0
            .into_iter()
            .map(|(key, record)| Ok((parse_key(section, &key)?, record)))
            .collect()
    }
}

fn parse_key(section: &str, key: &str) -> Result<u32> {
    match key.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(LibraryError::invalid_record(
            section,
            format!("key '{}' is not a positive integer", key),
        )),
    }
}

impl Serialize for RecordMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, record) in &self.0 {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RecordMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordMapVisitor;

        impl<'de> Visitor<'de> for RecordMapVisitor {
            type Value = RecordMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of item records keyed by index")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<RecordMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, record)) = access.next_entry::<String, ItemRecord>()? {
                    entries.push((key, record));
                }
                Ok(RecordMap(entries))
            }
        }

        deserializer.deserialize_map(RecordMapVisitor)
    }
}

/// Top-level library document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDocument {
    #[serde(default)]
    pub albums: RecordMap,
    #[serde(default)]
    pub singles: RecordMap,
}
