//! Error types for patch operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or building a patch.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Two blocks share an id
    #[error("duplicate block id: {0}")]
    DuplicateBlock(String),

    /// A connection names a block that does not exist
    #[error("unknown block id: {0}")]
    UnknownBlock(String),

    /// A block uses one of the reserved ids `input` or `output`
    #[error("block id '{0}' is reserved")]
    ReservedBlockId(String),

    /// An endpoint string could not be used
    #[error("malformed endpoint '{endpoint}': {reason}")]
    MalformedEndpoint {
        /// The offending endpoint text.
        endpoint: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid parameter
    #[error("invalid parameter '{param}' for block '{block}': {reason}")]
    InvalidParameter {
        /// Id of the block carrying the parameter.
        block: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// The graph rejected a connection
    #[error("wiring failed: {0}")]
    Graph(#[from] ondula_core::GraphError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed endpoint error.
    pub fn malformed_endpoint(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::MalformedEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}
