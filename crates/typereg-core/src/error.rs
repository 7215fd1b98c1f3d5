//! Core error types.

use thiserror::Error;

/// Type registry errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A type with the given name already exists.
    #[error("{0}: type already exists")]
    AlreadyExists(String),

    /// No type definition matched the lookup.
    #[error("{0}")]
    NotFound(String),

    /// Invalid data format.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a `NotFound` error for an enum name lookup.
    pub(crate) fn enum_not_found_by_name(name: &str) -> Self {
        Error::NotFound(format!("no enumdef exists with name {}", name))
    }

    /// Build a `NotFound` error for an enum guid lookup.
    pub(crate) fn enum_not_found_by_guid(guid: &str) -> Self {
        Error::NotFound(format!("no enumdef exists with guid {}", guid))
    }

    /// Check if this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is an `AlreadyExists` error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_))
    }
}
