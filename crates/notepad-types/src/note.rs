//! Note content and its remote record form.
//!
//! A `Note` is what the editor holds. A `NoteRecord` is one row in the
//! remote store; an account should own at most one of them, but the store
//! does not enforce that.

use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, NoteId};

/// Note content with its last-modified time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    /// Unix millis of the last persisted write.
    pub updated_at: u64,
}

impl Note {
    pub fn new(content: impl Into<String>, updated_at: u64) -> Self {
        Self {
            content: content.into(),
            updated_at,
        }
    }
}

/// A note row as stored remotely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub account_id: AccountId,
    pub content: String,
    /// Unix millis.
    pub created_at: u64,
    /// Unix millis.
    pub updated_at: u64,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Note::new(record.content, record.updated_at)
    }
}

/// Insert payload for a new note row. The store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewNote {
    pub account_id: AccountId,
    pub content: String,
    pub created_at: u64,
    pub updated_at: u64,
}

impl NewNote {
    /// A fresh row whose created and updated times are both `now`.
    pub fn new(account_id: AccountId, content: impl Into<String>, now: u64) -> Self {
        Self {
            account_id,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
