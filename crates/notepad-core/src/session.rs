//! The active login session.

use notepad_types::{Account, Session};
use tracing::info;

/// Holds at most one active [`Session`].
#[derive(Debug, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session for `account`, replacing any active one.
    pub fn start(&mut self, account: Account) -> &Session {
        let session = Session::new(account);
        if let Some(previous) = self.current.take() {
            info!(session = %previous.display_name(), "session replaced");
        }
        info!(session = %session.display_name(), "session started");
        self.current.insert(session)
    }

    /// End the active session and return it.
    pub fn end(&mut self) -> Option<Session> {
        let ended = self.current.take();
        if let Some(session) = &ended {
            info!(session = %session.display_name(), "session ended");
        }
        ended
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn account(&self) -> Option<&Account> {
        self.current.as_ref().map(|s| &s.account)
    }
}
