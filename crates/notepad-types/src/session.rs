//! Session metadata types.
//!
//! A `Session` records that an account logged in. Runtime state (timers,
//! the editor buffer) lives in `notepad-core`.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::ids::SessionId;

/// Birth certificate for a login session. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Who logged in.
    pub account: Account,
    /// Unix millis.
    pub started_at: u64,
}

impl Session {
    pub fn new(account: Account) -> Self {
        Self {
            id: SessionId::new(),
            account,
            started_at: crate::now_millis(),
        }
    }

    /// Display string: username plus short session id.
    pub fn display_name(&self) -> String {
        format!("{}@{}", self.account.username, self.id.short())
    }
}
