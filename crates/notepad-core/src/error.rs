//! Error types for notepad operations.
//!
//! Every user-facing operation returns [`NotepadError`]. Controllers catch
//! it at the operation boundary, raise a notification, and hand it back to
//! the caller; none of these errors are fatal.

use std::io;

use strum::{AsRefStr, Display};
use thiserror::Error;

/// Remote store operation that was being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StoreOp {
    Query,
    Insert,
    Update,
    Delete,
    FindAccount,
    CreateAccount,
}

/// Why a remote store call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RemoteErrorKind {
    /// Transport failure, store unreachable.
    Network,
    /// Credentials rejected.
    Auth,
    /// Uniqueness or foreign-key violation.
    Constraint,
    /// The addressed record does not exist.
    NotFound,
    /// Anything else the backend reported.
    Backend,
}

/// A failed remote store call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{op} failed ({kind}): {message}")]
pub struct RemoteError {
    pub op: StoreOp,
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(op: StoreOp, kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            op,
            kind,
            message: message.into(),
        }
    }

    pub fn network(op: StoreOp, message: impl Into<String>) -> Self {
        Self::new(op, RemoteErrorKind::Network, message)
    }

    pub fn auth(op: StoreOp, message: impl Into<String>) -> Self {
        Self::new(op, RemoteErrorKind::Auth, message)
    }

    pub fn constraint(op: StoreOp, message: impl Into<String>) -> Self {
        Self::new(op, RemoteErrorKind::Constraint, message)
    }

    pub fn not_found(op: StoreOp, message: impl Into<String>) -> Self {
        Self::new(op, RemoteErrorKind::NotFound, message)
    }

    pub fn backend(op: StoreOp, message: impl Into<String>) -> Self {
        Self::new(op, RemoteErrorKind::Backend, message)
    }
}

/// A share-link token that `decode` could not reverse.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// `%` not followed by two hex digits.
    #[error("invalid percent-escape at byte {position}")]
    InvalidEscape { position: usize },

    /// Percent pass produced something outside the base64 alphabet, or bad padding.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text.
    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Input rejected before any persistence happened.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("nothing to save")]
    EmptyContent,

    #[error("username must be at least {min} characters (got {got})")]
    UsernameTooShort { min: usize, got: usize },

    #[error("password must be at least {min} characters (got {got})")]
    PasswordTooShort { min: usize, got: usize },

    #[error("no saved link yet; save the note first")]
    NothingSaved,

    #[error("not logged in")]
    NotLoggedIn,
}

/// Local cache I/O failure.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cache entry for '{key}' is not UTF-8")]
    NotText { key: String },
}

/// Top-level error for notepad operations.
#[derive(Debug, Error)]
pub enum NotepadError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Cache(#[from] CacheError),

    #[error("clipboard error: {0}")]
    Clipboard(String),
}

/// Result type for notepad operations.
pub type Result<T> = std::result::Result<T, NotepadError>;
