//! # Core Configuration Module
//!
//! Provides configuration management for the music library core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance holding the settings the library, persistence and playback layers
//! need. Validation is fail-fast: `build()` refuses settings that would only
//! surface as errors on the first save.
//!
//! ## Settings
//!
//! - `database_path` - JSON document holding albums and singles
//!   (default: `music_database.json` in the working directory)
//! - `compact_keys_on_load` - Reassign 1..N keys when loading a document
//!   (default: `true`)
//! - `autosave` - Persist after every mutation (default: `true`)
//! - `pretty_indent` - Indent width of the written document (default: 4)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/home/me/music/music_database.json")
//!     .autosave(false)
//!     .build()?;
//! # Ok::<(), core_runtime::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // This will panic with an actionable error message
//! let config = CoreConfig::builder()
//!     .pretty_indent(64)
//!     .build()
//!     .expect("Should fail - indent too wide");
//! ```

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File name used when no database path is configured.
pub const DEFAULT_DATABASE_FILE: &str = "music_database.json";

/// Indent width of the written document when none is configured.
pub const DEFAULT_PRETTY_INDENT: usize = 4;

/// Widest indent accepted by [`CoreConfig::validate`].
pub const MAX_PRETTY_INDENT: usize = 16;

/// Core configuration for the music library.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Path to the JSON library document
    pub database_path: PathBuf,

    /// Order loaded entries by key and renumber them 1..N
    pub compact_keys_on_load: bool,

    /// Save the library after every successful mutation
    pub autosave: bool,

    /// Spaces per indent level in the saved document (0 writes compact JSON)
    pub pretty_indent: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            compact_keys_on_load: true,
            autosave: true,
            pretty_indent: DEFAULT_PRETTY_INDENT,
        }
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder();
    /// ```
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Database path names a file, not a directory
    /// - Indent width is at most [`MAX_PRETTY_INDENT`]
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        if has_trailing_separator(&self.database_path) {
            return Err(Error::Config(format!(
                "Database path '{}' names a directory. \
                 Point .database_path() at a file such as '{}'.",
                self.database_path.display(),
                DEFAULT_DATABASE_FILE
            )));
        }

        if self.pretty_indent > MAX_PRETTY_INDENT {
            return Err(Error::Config(format!(
                "Indent width {} exceeds maximum of {} spaces",
                self.pretty_indent, MAX_PRETTY_INDENT
            )));
        }

        Ok(())
    }
}

fn has_trailing_separator(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .last()
        .is_some_and(std::path::is_separator)
}

/// Builder for constructing a [`CoreConfig`] instance.
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    compact_keys_on_load: Option<bool>,
    autosave: Option<bool>,
    pretty_indent: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the library document path.
    pub fn database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Renumber entries 1..N when loading (default: `true`).
    ///
    /// When disabled the document's own keys are kept, which may leave gaps
    /// if the file was edited by hand.
    pub fn compact_keys_on_load(mut self, enabled: bool) -> Self {
        self.compact_keys_on_load = Some(enabled);
        self
    }

    /// Save after every mutation (default: `true`).
    pub fn autosave(mut self, enabled: bool) -> Self {
        self.autosave = Some(enabled);
        self
    }

    /// Sets the indent width of the saved document (default: 4).
    pub fn pretty_indent(mut self, width: usize) -> Self {
        self.pretty_indent = Some(width);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Unset fields take their defaults; the result is validated before it
    /// is returned.
    pub fn build(self) -> Result<CoreConfig> {
        let defaults = CoreConfig::default();

        let config = CoreConfig {
            database_path: self.database_path.unwrap_or(defaults.database_path),
            compact_keys_on_load: self
                .compact_keys_on_load
                .unwrap_or(defaults.compact_keys_on_load),
            autosave: self.autosave.unwrap_or(defaults.autosave),
            pretty_indent: self.pretty_indent.unwrap_or(defaults.pretty_indent),
        };

        config.validate()?;

        Ok(config)
    }
}
