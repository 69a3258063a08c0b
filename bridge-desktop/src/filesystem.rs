//! File System Access Implementation using `std::fs`

use bridge_traits::{
    error::{BridgeError, Result},
    storage::FileSystemAccess,
};
use bytes::Bytes;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blocking file system implementation
///
/// Provides whole-file I/O using:
/// - `std::fs` for reads and writes
/// - Write-to-temp then rename for atomic document replacement
///
/// Relative paths resolve against the process working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Convert std::io::Error to BridgeError
    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }

    /// Sibling path used while a write is in flight.
    fn staging_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

impl FileSystemAccess for StdFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists().map_err(Self::map_io_error)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(Self::map_io_error)?;
        debug!(path = ?path, "Created directory");
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).map_err(Self::map_io_error)?;
        debug!(path = ?path, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    fn write_file(&self, path: &Path, data: Bytes) -> Result<()> {
        let staging = Self::staging_path(path);
        if let Err(err) = fs::write(&staging, data.as_ref()) {
            let _ = fs::remove_file(&staging);
            return Err(Self::map_io_error(err));
        }
        fs::rename(&staging, path).map_err(|err| {
            let _ = fs::remove_file(&staging);
            Self::map_io_error(err)
        })?;

        debug!(path = ?path, size = data.len(), "Wrote file");
        Ok(())
    }
}
