use thiserror::Error;

/// Errors raised while setting up the runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value was rejected; the message says which one.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The global subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;
