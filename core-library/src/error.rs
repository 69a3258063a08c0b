use bridge_traits::error::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Invalid album key: {}", display_key(.0))]
    InvalidAlbumKey(Option<u32>),

    #[error("Item kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The collection already holds the largest representable key.
    #[error("No key left in the {collection} collection")]
    KeysExhausted { collection: &'static str },

    #[error("Invalid record: {field} - {message}")]
    InvalidRecord { field: String, message: String },

    #[error("No music database found at {}", .path.display())]
    StorageUnavailable { path: PathBuf },

    #[error("Failed to save library: {0}")]
    StorageWriteFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl LibraryError {
    pub(crate) fn invalid_record(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Conditions the caller can report and carry on from.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Serialization(_) | Self::InvalidRecord { .. })
    }
}

fn display_key(key: &Option<u32>) -> String {
    match key {
        Some(key) => key.to_string(),
        None => "none given".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
