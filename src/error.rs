use std::path::{Path, PathBuf};

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures that abort an MFA session run
#[derive(Debug, Error)]
pub enum Error {
    /// The shared AWS config file exists but could not be parsed
    #[error("Failed to read AWS config file {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: BoxError },

    /// The MFA code could not be read from the terminal
    #[error("Failed to read MFA token from terminal: {0}")]
    TerminalIo(#[source] std::io::Error),

    /// STS rejected or failed the credential exchange
    #[error("{operation} failed: {source}")]
    AuthApi {
        operation: &'static str,
        source: BoxError,
    },

    /// STS answered without a credentials block
    #[error("AWS STS {0} returned no credentials")]
    MissingCredentials(&'static str),

    #[error("Session cache error at {}: {source}", path.display())]
    Store { path: PathBuf, source: BoxError },

    #[error("Failed to write {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write session summary: {0}")]
    Output(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config_read(path: &Path, source: impl Into<BoxError>) -> Self {
        Self::ConfigRead {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn auth_api(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::AuthApi {
            operation,
            source: source.into(),
        }
    }

    pub fn store(path: &Path, source: impl Into<BoxError>) -> Self {
        Self::Store {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn artifact_write(path: &Path, source: std::io::Error) -> Self {
        Self::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        }
    }
}
