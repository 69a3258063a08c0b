//! # Library Management Module
//!
//! Owns the music library: albums with their ordered songs, and standalone
//! singles.
//!
//! ## Overview
//!
//! This module manages:
//! - The item model (albums, songs, singles) and its storage records
//! - Dense 1..N keyed collections, renumbered after every deletion
//! - Duplicate-free additions by value equality
//! - Loading and saving the library document through `FileSystemAccess`

pub mod collection;
pub mod error;
pub mod models;
pub mod persistence;
pub mod record;
pub mod store;

pub use collection::Collection;
pub use error::{LibraryError, Result};
pub use models::{Album, ItemKind, MusicEntry, MusicItem, Track, TrackVariant, SINGLE_ALBUM_NAME};
pub use persistence::{LibraryPersistence, LoadedLibrary};
pub use record::{ItemRecord, LibraryDocument, RecordMap};
pub use store::{CollectionMut, Library, LibraryItem, TrackLocation};
