//! Error types for the board access layer.
//!
//! # Design
//! The unofficial surface fails in a handful of distinguishable ways, and each
//! gets its own variant so callers can branch without string matching:
//! a request that could not be built, a remote refusal, the one refusal we
//! recognise by message (duplicate board name), markup or JSON that no longer
//! has the shape the extractors depend on, and a transport that never produced
//! a response at all.

use thiserror::Error;

/// Errors returned by `BoardClient` and `BoardService` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Request construction input was malformed (bad path, missing session).
    #[error("invalid request configuration: {0}")]
    Configuration(String),

    /// The remote answered with a non-200 status or a JSON `"failure"` status
    /// carrying a message we do not recognise.
    #[error("remote operation failed (HTTP {status}): {message}")]
    RemoteOperation { status: u16, message: String },

    /// The remote refused to create a board because one with the same name
    /// already exists for this user.
    #[error("a board named {title:?} already exists")]
    BoardExists { title: String },

    /// The page or JSON body lacks an element, attribute or field an extractor
    /// requires.
    #[error("unexpected response shape: {0}")]
    DataShape(String),

    /// The transport failed before any response was received.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ApiError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        ApiError::DataShape(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ApiError::Configuration(msg.into())
    }
}
