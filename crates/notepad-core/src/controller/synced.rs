//! Account-synced notepad.

use std::sync::Arc;

use notepad_types::{Account, Note, Session};
use tracing::instrument;

use super::failure_message;
use crate::auth::AccountService;
use crate::autosave::AutoSyncScheduler;
use crate::clock::SharedClock;
use crate::config::NotepadConfig;
use crate::editor::{SharedEditor, shared_editor};
use crate::error::{NotepadError, Result, ValidationError};
use crate::notify::Notifier;
use crate::reconciler::WriteOutcome;
use crate::scheduler::Scheduler;
use crate::session::SessionContext;
use crate::stats::Stats;
use crate::store::SharedStore;
use crate::sync::SyncClient;

/// Notepad backed by one note per account in a remote store.
///
/// Logging in starts a session, pulls the saved note, and starts the
/// periodic auto-sync. Logging out stops it and empties the buffer.
pub struct SyncedNotepad {
    editor: SharedEditor,
    sync: Arc<SyncClient>,
    accounts: AccountService,
    session: SessionContext,
    autosync: AutoSyncScheduler,
    notifier: Notifier,
}

impl SyncedNotepad {
    pub fn new(config: &NotepadConfig, store: SharedStore, clock: SharedClock) -> Self {
        let editor = shared_editor();
        let notifier = Notifier::new(Arc::clone(&clock), config.notification_dismiss());
        let sync = Arc::new(SyncClient::new(Arc::clone(&store), clock));
        let autosync = AutoSyncScheduler::new(
            Arc::new(Scheduler::new()),
            Arc::clone(&editor),
            Arc::clone(&sync),
            notifier.clone(),
            config.autosync_period(),
        );
        Self {
            editor,
            sync,
            accounts: AccountService::new(store, config.credential_policy()),
            session: SessionContext::new(),
            autosync,
            notifier,
        }
    }

    pub fn editor(&self) -> &SharedEditor {
        &self.editor
    }

    pub fn content(&self) -> String {
        self.editor.lock().content().to_string()
    }

    pub fn stats(&self) -> Stats {
        self.editor.lock().stats()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn autosync(&self) -> &AutoSyncScheduler {
        &self.autosync
    }

    /// Log in (registering unseen usernames), then pull the saved note.
    ///
    /// A failed pull is reported but does not undo the login.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        let account = match self.accounts.login(username, password).await {
            Ok(account) => account,
            Err(e) => return Err(self.fail("Login failed", e)),
        };

        let session = self.session.start(account.clone()).clone();
        self.autosync.start(account);
        self.notifier.success(format!("Logged in as {}", session.account.username));

        // Reported through its own notification.
        let _ = self.load().await;
        Ok(session)
    }

    /// Stop auto-sync, end the session, and empty the buffer.
    pub fn logout(&mut self) -> Option<Session> {
        self.autosync.stop();
        let ended = self.session.end();
        self.editor.lock().clear();
        if ended.is_some() {
            self.notifier.info("Logged out");
        }
        ended
    }

    /// Push the trimmed buffer as the account's note.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<WriteOutcome> {
        let account = self.require_account("Failed to save note")?;
        let (content, revision) = self.editor.lock().snapshot();
        let content = content.trim();
        if content.is_empty() {
            return Err(self.fail("Failed to save note", ValidationError::EmptyContent.into()));
        }

        match self.sync.push(&account, content).await {
            Ok(outcome) => {
                self.autosync.mark_pushed(revision);
                self.notifier.success("Note saved");
                Ok(outcome)
            }
            Err(e) => Err(self.fail("Failed to save note", e.into())),
        }
    }

    /// Replace the buffer with the account's saved note, if it has one.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Option<Note>> {
        let account = self.require_account("Failed to load note")?;
        match self.sync.pull(&account).await {
            Ok(Some(note)) => {
                let revision = {
                    let mut editor = self.editor.lock();
                    editor.set_content(note.content.clone());
                    editor.revision()
                };
                self.autosync.mark_pushed(revision);
                self.notifier.success("Note loaded");
                Ok(Some(note))
            }
            Ok(None) => {
                self.notifier.info("No saved note yet");
                Ok(None)
            }
            Err(e) => Err(self.fail("Failed to load note", e.into())),
        }
    }

    /// Replace the buffer with typed text. Auto-sync picks it up on its
    /// next tick.
    pub fn input(&self, text: impl Into<String>) -> Stats {
        self.editor.lock().set_content(text)
    }

    /// Empty the buffer. The remote note is left alone until the next save.
    pub fn clear(&self) {
        self.editor.lock().clear();
        self.notifier.success("Note cleared");
    }

    fn require_account(&self, action: &str) -> Result<Account> {
        self.session
            .account()
            .cloned()
            .ok_or_else(|| self.fail(action, ValidationError::NotLoggedIn.into()))
    }

    fn fail(&self, action: &str, err: NotepadError) -> NotepadError {
        self.notifier.error(failure_message(action, &err));
        err
    }
}
