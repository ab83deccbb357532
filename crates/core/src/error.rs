//! Error types surfaced while preparing a game.
//!
//! Game operations themselves never fail; invalid input is ignored. Only
//! configuration loading and validation can go wrong.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate an [`AppConfig`](crate::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The face list is empty, so no deck can be dealt.
    #[error("no card faces configured")]
    NoFaces,
    /// A face name is empty or whitespace.
    #[error("card face names must not be blank")]
    BlankFace,
    /// The same face appears twice, which would put four copies in the deck.
    #[error("card face '{0}' is configured more than once")]
    DuplicateFace(String),
    /// The grid layout needs at least one column.
    #[error("grid must have at least one column")]
    ZeroColumns,
    /// Layered sources could not be merged or deserialized.
    #[error(transparent)]
    Source(#[from] ::config::ConfigError),
    /// Reading or writing the config file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The default config could not be rendered as JSON.
    #[error("failed to serialize default configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}
