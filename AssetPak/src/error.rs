//! Error types for `AssetPak`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `AssetPak` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Discovery Errors ====================
    /// A filesystem call failed while walking an input root.
    #[error("{op} {}: {source}", path.display())]
    Fs {
        /// The failed operation (`stat`, `readdir`, `readlink`, ...).
        op: &'static str,
        /// The path the operation was applied to.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A file produced an empty logical name.
    #[error("invalid file: {}", path.display())]
    InvalidFile {
        /// The source path that produced the empty name.
        path: PathBuf,
    },

    // ==================== Generation Errors ====================
    /// Reading an asset's bytes failed during generation.
    #[error("read asset {name:?}: {source}")]
    AssetRead {
        /// Logical name of the asset being rendered.
        name: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The GZIP stream failed while encoding an asset.
    #[error("compress asset {name:?}: {source}")]
    Compression {
        /// Logical name of the asset being rendered.
        name: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Configuration Errors ====================
    /// An ignore pattern is not a valid regular expression.
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The pattern source text.
        pattern: String,
        /// The regex compile error.
        source: regex::Error,
    },

    /// The configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The TOML configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Wrap an IO error from a discovery filesystem call.
    pub(crate) fn fs(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Fs {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for `AssetPak` operations.
pub type Result<T> = std::result::Result<T, Error>;
