//! Persistence adapter
//!
//! Loads and saves the whole library as one JSON document through the host's
//! [`FileSystemAccess`]. Every save replaces the previous document entirely.

use crate::collection::Collection;
use crate::error::{LibraryError, Result};
use crate::models::{Album, MusicEntry, Track};
use crate::record::{LibraryDocument, RecordMap};
use crate::store::Library;
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use core_runtime::config::{CoreConfig, DEFAULT_PRETTY_INDENT};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of [`LibraryPersistence::load`]
///
/// `condition` carries a recoverable problem the caller should report, such
/// as [`LibraryError::StorageUnavailable`] when no document exists yet.
#[derive(Debug)]
pub struct LoadedLibrary {
    pub library: Library,
    pub condition: Option<LibraryError>,
}

/// Reads and writes the library document
pub struct LibraryPersistence {
    fs: Arc<dyn FileSystemAccess>,
    path: PathBuf,
    compact_keys: bool,
    indent: usize,
}

impl LibraryPersistence {
    /// Document at `path` with default settings: keys compacted on load and
    /// four-space indentation.
    pub fn new(fs: Arc<dyn FileSystemAccess>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            compact_keys: true,
            indent: DEFAULT_PRETTY_INDENT,
        }
    }

    pub fn from_config(fs: Arc<dyn FileSystemAccess>, config: &CoreConfig) -> Self {
        Self::new(fs, config.database_path.clone())
            .with_compact_keys(config.compact_keys_on_load)
            .with_indent(config.pretty_indent)
    }

    pub fn with_compact_keys(mut self, enabled: bool) -> Self {
        self.compact_keys = enabled;
        self
    }

    /// Indent width of saved documents; 0 writes compact JSON.
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the library document.
    ///
    /// A missing document is not an error: an empty library is returned with
    /// [`LibraryError::StorageUnavailable`] as its condition. Unreadable or
    /// malformed documents are errors.
    pub fn load(&self) -> Result<LoadedLibrary> {
        if !self.fs.exists(&self.path)? {
            warn!(path = ?self.path, "No music database found, starting with an empty library");
            return Ok(LoadedLibrary {
                library: Library::new(),
                condition: Some(LibraryError::StorageUnavailable {
                    path: self.path.clone(),
                }),
            });
        }

        let data = self.fs.read_file(&self.path)?;
        let library = self.decode(&data)?;
        info!(
            path = ?self.path,
            albums = library.albums().len(),
            singles = library.singles().len(),
            "Loaded music library"
        );

        Ok(LoadedLibrary {
            library,
            condition: None,
        })
    }

    /// Write `library`, replacing any existing document.
    ///
    /// The document's directory is created first when missing. Failures are
    /// reported as [`LibraryError::StorageWriteFailure`]; the in-memory
    /// library is never touched.
    pub fn save(&self, library: &Library) -> Result<()> {
        let data = self.encode(library)?;
        let size = data.len();

        let written = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => self
                .fs
                .create_dir_all(parent)
                .and_then(|()| self.fs.write_file(&self.path, data)),
            None => self.fs.write_file(&self.path, data),
        };
        written.map_err(|e| {
            warn!(path = ?self.path, error = %e, "Failed to save music library");
            LibraryError::StorageWriteFailure(format!("{}: {}", self.path.display(), e))
        })?;

        debug!(path = ?self.path, size, "Saved music library");
        Ok(())
    }

    /// Serialize `library` as a document.
    pub fn encode(&self, library: &Library) -> Result<Bytes> {
        let document = to_document(library);
        if self.indent == 0 {
            return Ok(Bytes::from(serde_json::to_vec(&document)?));
        }

        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        document.serialize(&mut serializer)?;
        Ok(Bytes::from(out))
    }

    /// Parse a document into a library.
    ///
    /// Albums are read before singles. Keys follow the configured policy.
    pub fn decode(&self, data: &[u8]) -> Result<Library> {
        let document: LibraryDocument = serde_json::from_slice(data)?;

        let albums = document
            .albums
            .into_keyed("albums")?
            .into_iter()
            .map(|(key, record)| -> Result<(u32, Album)> {
                Ok((key, Album::from_record_with(record, self.compact_keys)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let singles = document
            .singles
            .into_keyed("singles")?
            .into_iter()
            .map(|(key, record)| -> Result<(u32, Track)> {
                Ok((key, Track::from_single_record(record)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Library::from_parts(
            self.keyed(albums, "albums")?,
            self.keyed(singles, "singles")?,
        ))
    }

    fn keyed<T>(&self, entries: Vec<(u32, T)>, section: &str) -> Result<Collection<T>> {
        if self.compact_keys {
            return Ok(Collection::compacted(entries));
        }
        Collection::try_from_entries(entries).map_err(|key| {
            LibraryError::invalid_record(section, format!("duplicate key {}", key))
        })
    }
}

fn to_document(library: &Library) -> LibraryDocument {
    let mut albums = RecordMap::default();
    for (key, album) in library.albums().iter() {
        albums.push(key, album.to_record());
    }

    let mut singles = RecordMap::default();
    for (key, single) in library.singles().iter() {
        singles.push(key, single.to_record());
    }

    LibraryDocument { albums, singles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::{mock, Sequence};

    mock! {
        Fs {}

        impl FileSystemAccess for Fs {
            fn exists(&self, path: &Path) -> BridgeResult<bool>;
            fn create_dir_all(&self, path: &Path) -> BridgeResult<()>;
            fn read_file(&self, path: &Path) -> BridgeResult<Bytes>;
            fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()>;
        }
    }

    fn library() -> Library {
        let mut library = Library::new();
        let album = Album::new("Blue Train", "John Coltrane", "1957");
        let key = library.add_album(album.clone()).unwrap().unwrap();
        library
            .add_song(key, album.new_song("Locomotion", "John Coltrane", "1957", "loco.mp3"))
            .unwrap();
        library
            .add_single(Track::single("Naima", "John Coltrane", "1959", ""))
            .unwrap();
        library
    }

    fn persistence(fs: MockFs) -> LibraryPersistence {
        LibraryPersistence::new(Arc::new(fs), "music_database.json")
    }

    #[test]
    fn test_missing_document_yields_empty_library() {
        let mut fs = MockFs::new();
        fs.expect_exists()
            .withf(|path| path == Path::new("music_database.json"))
            .times(1)
            .returning(|_| Ok(false));
        fs.expect_read_file().never();

        let loaded = persistence(fs).load().unwrap();
        assert!(loaded.library.is_empty());
        assert!(matches!(
            loaded.condition,
            Some(LibraryError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn test_write_failure_reported() {
        let mut fs = MockFs::new();
        fs.expect_write_file()
            .times(1)
            .returning(|_, _| Err(BridgeError::OperationFailed("disk full".to_string())));

        let library = library();
        let err = persistence(fs).save(&library).unwrap_err();

        match err {
            LibraryError::StorageWriteFailure(msg) => {
                assert!(msg.contains("music_database.json"));
                assert!(msg.contains("disk full"));
            }
            other => panic!("expected write failure, got {:?}", other),
        }
        assert_eq!(library.len(ItemKind::Single, None).unwrap(), 1);
    }

    #[test]
    fn test_save_creates_document_directory_first() {
        let mut fs = MockFs::new();
        let mut seq = Sequence::new();
        fs.expect_create_dir_all()
            .withf(|path| path == Path::new("library"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|path, data| path == Path::new("library/music_database.json") && !data.is_empty())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        LibraryPersistence::new(Arc::new(fs), "library/music_database.json")
            .save(&library())
            .unwrap();
    }

    #[test]
    fn test_directory_failure_skips_write() {
        let mut fs = MockFs::new();
        fs.expect_create_dir_all()
            .returning(|_| Err(BridgeError::OperationFailed("read-only".to_string())));
        fs.expect_write_file().never();

        let err = LibraryPersistence::new(Arc::new(fs), "library/music_database.json")
            .save(&library())
            .unwrap_err();
        assert!(matches!(err, LibraryError::StorageWriteFailure(_)));
    }

    #[test]
    fn test_read_failure_is_an_error() {
        let mut fs = MockFs::new();
        fs.expect_exists().returning(|_| Ok(true));
        fs.expect_read_file()
            .returning(|_| Err(BridgeError::NotAvailable("locked".to_string())));

        let err = persistence(fs).load().unwrap_err();
        assert!(matches!(err, LibraryError::Bridge(_)));
    }

    #[test]
    fn test_encode_uses_configured_indent() {
        let fs = MockFs::new();
        let four = persistence(fs).encode(&library()).unwrap();
        let text = std::str::from_utf8(&four).unwrap();
        assert!(text.starts_with("{\n    \"albums\": {\n        \"1\": {"));

        let compact = persistence(MockFs::new())
            .with_indent(0)
            .encode(&library())
            .unwrap();
        assert!(!compact.contains(&b'\n'));
    }

    #[test]
    fn test_encoded_field_names() {
        let data = persistence(MockFs::new()).encode(&library()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&data).unwrap();

        let album = &value["albums"]["1"];
        assert_eq!(album["music_item_type"], "Album");
        assert_eq!(album["songs"]["1"]["music_item_type"], "Song");
        assert_eq!(album["songs"]["1"]["album"], "Blue Train");
        assert_eq!(album["songs"]["1"]["file_name"], "loco.mp3");

        let single = &value["singles"]["1"];
        assert_eq!(single["music_item_type"], "Single");
        assert_eq!(single["album"], "Single");
        assert_eq!(single["file_name"], "");
        assert!(single.get("currently_playing").is_none());
    }

    #[test]
    fn test_decode_compacts_keys() {
        let json = br#"{
            "albums": {},
            "singles": {
                "9": {"name": "B", "artist": "x", "release_date": "2", "music_item_type": "Single", "album": "Single", "file_name": "b.mp3"},
                "3": {"name": "A", "artist": "x", "release_date": "1", "music_item_type": "Single", "album": "Single", "file_name": "a.mp3"}
            }
        }"#;

        let library = persistence(MockFs::new()).decode(json).unwrap();
        assert_eq!(library.single(1).unwrap().name(), "A");
        assert_eq!(library.single(2).unwrap().name(), "B");
    }

    #[test]
    fn test_decode_trusting_keys() {
        let json = br#"{
            "singles": {
                "9": {"name": "B", "artist": "x", "release_date": "2", "music_item_type": "Single"},
                "3": {"name": "A", "artist": "x", "release_date": "1", "music_item_type": "Single"}
            }
        }"#;

        let trusting = persistence(MockFs::new()).with_compact_keys(false);
        let library = trusting.decode(json).unwrap();
        assert_eq!(library.singles().keys(), vec![3, 9]);
        assert_eq!(library.single(9).unwrap().name(), "B");
        assert_eq!(library.single(9).unwrap().album, "Single");

        let duplicated = br#"{"singles": {
            "1": {"name": "A", "artist": "x", "release_date": "1"},
            "1": {"name": "B", "artist": "x", "release_date": "2"}
        }}"#;
        let err = trusting.decode(duplicated).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidRecord { .. }));
    }

    #[test]
    fn test_untagged_single_loads_as_single() {
        let json = br#"{"singles": {
            "1": {"name": "Naima", "artist": "John Coltrane", "release_date": "1959", "file_name": "n.mp3"}
        }}"#;

        let mut library = persistence(MockFs::new()).decode(json).unwrap();
        let naima = library.single(1).unwrap();
        assert!(naima.is_single());
        assert_eq!(naima.album, "Single");
        assert_eq!(naima.tag(), "Single");

        let again = Track::single("Naima", "John Coltrane", "1959", "n.mp3");
        assert_eq!(library.add(ItemKind::Single, again, None).unwrap(), None);
        assert_eq!(library.len(ItemKind::Single, None).unwrap(), 1);
    }

    #[test]
    fn test_album_record_in_singles_rejected() {
        let json = br#"{"singles": {
            "1": {"name": "Ballads", "artist": "John Coltrane", "release_date": "1962", "music_item_type": "Album"}
        }}"#;

        assert!(matches!(
            persistence(MockFs::new()).decode(json),
            Err(LibraryError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_trusted_largest_key_refuses_further_adds() {
        let json = br#"{"singles": {
            "4294967295": {"name": "Last", "artist": "x", "release_date": "1", "music_item_type": "Single"}
        }}"#;

        let trusting = persistence(MockFs::new()).with_compact_keys(false);
        let mut library = trusting.decode(json).unwrap();
        assert_eq!(library.singles().keys(), vec![u32::MAX]);

        let err = library
            .add_single(Track::single("Next", "x", "2", ""))
            .unwrap_err();
        assert!(matches!(
            err,
            LibraryError::KeysExhausted { collection: "single" }
        ));
        assert_eq!(library.len(ItemKind::Single, None).unwrap(), 1);

        // the default loader renumbers, leaving room
        let mut compacted = persistence(MockFs::new()).decode(json).unwrap();
        assert_eq!(
            compacted.add_single(Track::single("Next", "x", "2", "")).unwrap(),
            Some(2)
        );
    }

    #[test]
    fn test_decode_rejects_malformed_documents() {
        let persistence = persistence(MockFs::new());

        assert!(matches!(
            persistence.decode(b"not json"),
            Err(LibraryError::Serialization(_))
        ));
        assert!(matches!(
            persistence.decode(br#"{"albums": {"first": {"name": "a", "artist": "b", "release_date": "c"}}}"#),
            Err(LibraryError::InvalidRecord { .. })
        ));
    }
}
