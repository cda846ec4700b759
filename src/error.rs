//! Error types shared by every module of the crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the cascade, compiler, revision store and import path.
#[derive(Error, Debug)]
pub enum Error {
    /// The path does not address a leaf of the defaults schema.
    ///
    /// This is a programmer error: editor controls are bound to fixed paths.
    #[error("invalid setting path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The desktop layer has no value at a schema path.
    ///
    /// Desktop is backfilled from defaults on load, so this indicates a
    /// corrupted tree rather than a runtime condition.
    #[error("desktop settings are missing '{path}'")]
    MissingPath { path: String },

    /// A history entry referenced by id does not exist.
    #[error("history entry '{id}' not found")]
    NotFound { id: String },

    /// A color string could not be parsed.
    ///
    /// The filter engine recovers from this locally; it is only returned by
    /// [`parse_rgb`](crate::filter::parse_rgb).
    #[error("malformed color '{input}'")]
    MalformedColor { input: String },

    /// An import payload could not be used.
    #[error("malformed import: {reason}")]
    MalformedImport { reason: String },

    /// A settings document has the wrong shape (e.g. a group where a leaf is expected).
    #[error("invalid settings at '{path}': {reason}")]
    InvalidSettings { path: String, reason: String },

    /// The host key-value store rejected a read or write.
    #[error("storage error on '{key}': {reason}")]
    Storage { key: String, reason: String },

    /// JSON (de)serialization failed.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_settings(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSettings {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn storage(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Storage {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
