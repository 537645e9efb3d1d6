//! Error types for hook synchronization

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Could not determine repository root: {0}")]
    RepositoryRoot(String),

    #[error("Could not list hook directory {path:?}: {source}")]
    ListSource {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove {path:?}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for HookError {
    fn from(err: toml::de::Error) -> Self {
        HookError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for HookError {
    fn from(err: toml::ser::Error) -> Self {
        HookError::Config(err.to_string())
    }
}

impl From<regex::Error> for HookError {
    fn from(err: regex::Error) -> Self {
        HookError::Config(format!("invalid marker: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, HookError>;
