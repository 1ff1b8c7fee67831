//! Account identity.
//!
//! An `Account` owns at most one synced note. It is created on the first
//! login with an unseen username and never changes afterwards. Only the
//! credential digest is kept; clear-text passwords never reach this type.

use serde::{Deserialize, Serialize};

use crate::ids::AccountId;

/// A registered account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique login handle.
    pub username: String,
    /// Hex SHA-256 digest of the password.
    pub credential_hash: String,
    /// Unix millis.
    pub created_at: u64,
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.username, self.id.short())
    }
}

/// Insert payload for a new account. The store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub credential_hash: String,
    pub created_at: u64,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, credential_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            credential_hash: credential_hash.into(),
            created_at: crate::now_millis(),
        }
    }
}
