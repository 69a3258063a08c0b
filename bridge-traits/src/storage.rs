//! Storage and File System Abstractions
//!
//! Provides the platform-agnostic file I/O trait the persistence adapter uses
//! to read and replace the library document.

use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// File system access trait
///
/// Abstracts the handful of whole-file operations the core needs:
/// - Desktop: Direct filesystem access
/// - Tests: In-memory or mocked stores
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// fn save(fs: &dyn FileSystemAccess, path: &Path, json: String) -> Result<()> {
///     if let Some(parent) = path.parent() {
///         fs.create_dir_all(parent)?;
///     }
///     fs.write_file(path, json.into())
/// }
/// ```
pub trait FileSystemAccess {
    /// Check if a file or directory exists
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Create a directory and all parent directories if they don't exist
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Read entire file contents into memory
    fn read_file(&self, path: &Path) -> Result<Bytes>;

    /// Write data to a file, replacing any previous contents entirely
    ///
    /// Implementations should make the replacement atomic where the platform
    /// allows it, so readers never observe a half-written document.
    ///
    /// The parent directory must already exist.
    fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;
}
