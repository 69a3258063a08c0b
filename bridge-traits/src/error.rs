use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The audio file exists but could not be decoded.
    #[error("Cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("No audio file loaded")]
    NothingLoaded,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
