//! Shared identity and note types for notepad.
//!
//! Leaf crate with no internal notepad dependencies: typed ids, notes,
//! remote note records, accounts, and sessions.
//!
//! ```text
//! Account (AccountId)
//!     └── owns at most one NoteRecord (NoteId) in the remote store
//!     └── opens Session (SessionId)
//! ```

pub mod account;
pub mod ids;
pub mod note;
pub mod session;

pub use account::{Account, NewAccount};
pub use ids::{AccountId, NoteId, SessionId};
pub use note::{NewNote, Note, NoteRecord};
pub use session::Session;

/// Current time as Unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
