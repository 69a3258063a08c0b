use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Library error: {0}")]
    Library(#[from] core_library::LibraryError),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),
}

impl CoreError {
    /// Whether the service stays usable after this error.
    ///
    /// Playback and storage failures leave the library intact; only
    /// start-up and configuration problems are fatal.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoreError::InitializationFailed(_) | CoreError::Config(_) => false,
            CoreError::Library(err) => err.is_recoverable(),
            CoreError::Playback(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
