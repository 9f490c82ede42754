//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when loading, saving, or parsing an Orbis config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file (or its directory) could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file (or its directory) could not be written.
    #[error("failed to write config {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse config {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// The in-memory config could not be turned into RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}

impl ConfigError {
    /// The file or directory the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::ReadError { path, .. }
            | Self::WriteError { path, .. }
            | Self::ParseError { path, .. } => Some(path),
            Self::SerializeError(_) => None,
        }
    }
}
