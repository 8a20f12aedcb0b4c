use std::path::PathBuf;

use crate::io::lock::LockError;

/// Rejected input when building a `PathEntry`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path too short to name a file: {0:?}")]
    TooShort(String),
    #[error("path resolves to the filesystem root: {0:?}")]
    Root(String),
}

/// Error type for loading and saving the recent list
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("recent list is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("could not parse recent list: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize recent list: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid entry #{index}: {source}")]
    InvalidEntry { index: usize, source: PathError },
    #[error(transparent)]
    Lock(#[from] LockError),
}
