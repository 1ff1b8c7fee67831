//! Editor controllers.
//!
//! Each controller owns a shared editor buffer, a [`Notifier`], and the
//! persistence collaborators for its variant. Every public operation
//! finishes with one notification and returns its outcome as a `Result`.
//!
//! - [`LinkNotepad`]: content lives in a share-link fragment, mirrored to a
//!   local cache.
//! - [`SyncedNotepad`]: content lives in a remote store under a login.
//!
//! [`Notifier`]: crate::notify::Notifier

mod link;
mod synced;

pub use link::LinkNotepad;
pub use synced::SyncedNotepad;

use crate::error::{NotepadError, ValidationError};

/// Where [`LinkNotepad::open`] found the content it loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from the link fragment.
    Link,
    /// Fragment absent; restored from the local cache.
    Cache,
    /// Neither had anything.
    Empty,
}

/// Notification text for a failed operation.
fn failure_message(action: &str, err: &NotepadError) -> String {
    match err {
        NotepadError::Validation(ValidationError::EmptyContent) => "Nothing to save".to_string(),
        NotepadError::Validation(v) => capitalize(&v.to_string()),
        other => format!("{action}: {other}"),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RemoteError, StoreOp};

    #[test]
    fn test_failure_message() {
        let empty = NotepadError::Validation(ValidationError::EmptyContent);
        assert_eq!(failure_message("Failed to save note", &empty), "Nothing to save");

        let short = NotepadError::Validation(ValidationError::UsernameTooShort { min: 4, got: 2 });
        assert_eq!(
            failure_message("Login failed", &short),
            "Username must be at least 4 characters (got 2)"
        );

        let remote = NotepadError::Remote(RemoteError::network(StoreOp::Insert, "offline"));
        assert!(
            failure_message("Failed to save note", &remote).starts_with("Failed to save note: ")
        );
    }
}
