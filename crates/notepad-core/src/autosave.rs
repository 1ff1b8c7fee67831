//! Background persistence: debounced cache writes and periodic sync.
//!
//! Both schedulers read the shared editor buffer when they fire, never at
//! schedule time, so they always persist the latest content.

use std::sync::Arc;
use std::time::Duration;

use notepad_types::Account;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::LocalCache;
use crate::editor::SharedEditor;
use crate::notify::Notifier;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::sync::SyncClient;

/// Mirrors the buffer into the local cache once input goes quiet.
pub struct AutoSaveScheduler {
    scheduler: Arc<Scheduler>,
    editor: SharedEditor,
    cache: Arc<dyn LocalCache>,
    key: String,
    delay: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl AutoSaveScheduler {
    pub fn new(
        scheduler: Arc<Scheduler>,
        editor: SharedEditor,
        cache: Arc<dyn LocalCache>,
        key: impl Into<String>,
        delay: Duration,
    ) -> Self {
        Self {
            scheduler,
            editor,
            cache,
            key: key.into(),
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Restart the quiet period. Call on every edit.
    pub fn touch(&self) {
        let mut pending = self.pending.lock();
        if let Some(handle) = pending.take() {
            self.scheduler.cancel(handle);
        }

        let editor = Arc::clone(&self.editor);
        let cache = Arc::clone(&self.cache);
        let key = self.key.clone();
        let handle = self.scheduler.schedule_debounced(self.delay, move || async move {
            let content = editor.lock().content().to_string();
            if content.is_empty() {
                return;
            }
            match cache.set(&key, &content) {
                Ok(()) => debug!(%key, bytes = content.len(), "autosaved"),
                Err(e) => warn!(%key, error = %e, "autosave failed"),
            }
        });
        *pending = Some(handle);
    }

    /// Drop the pending write, if any.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => self.scheduler.cancel(handle),
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .is_some_and(|handle| self.scheduler.is_pending(handle))
    }
}

/// Pushes the buffer on a fixed period while a session is active.
pub struct AutoSyncScheduler {
    scheduler: Arc<Scheduler>,
    editor: SharedEditor,
    sync: Arc<SyncClient>,
    notifier: Notifier,
    period: Duration,
    handle: Mutex<Option<TimerHandle>>,
    /// Buffer revision of the last successful push.
    last_pushed: Arc<Mutex<Option<u64>>>,
}

impl AutoSyncScheduler {
    pub fn new(
        scheduler: Arc<Scheduler>,
        editor: SharedEditor,
        sync: Arc<SyncClient>,
        notifier: Notifier,
        period: Duration,
    ) -> Self {
        Self {
            scheduler,
            editor,
            sync,
            notifier,
            period,
            handle: Mutex::new(None),
            last_pushed: Arc::new(Mutex::new(None)),
        }
    }

    /// Start pushing for `account`. Replaces any running interval.
    pub fn start(&self, account: Account) {
        self.stop();

        let editor = Arc::clone(&self.editor);
        let sync = Arc::clone(&self.sync);
        let notifier = self.notifier.clone();
        let last_pushed = Arc::clone(&self.last_pushed);
        let account = Arc::new(account);

        let handle = self.scheduler.schedule_interval(self.period, move || {
            let editor = Arc::clone(&editor);
            let sync = Arc::clone(&sync);
            let notifier = notifier.clone();
            let last_pushed = Arc::clone(&last_pushed);
            let account = Arc::clone(&account);
            async move {
                let (content, revision) = editor.lock().snapshot();
                let content = content.trim();
                if content.is_empty() || *last_pushed.lock() == Some(revision) {
                    return;
                }
                match sync.push(&account, content).await {
                    Ok(_) => {
                        *last_pushed.lock() = Some(revision);
                        debug!(account = %account.username, revision, "auto-synced");
                    }
                    Err(e) => {
                        warn!(account = %account.username, error = %e, "auto-sync failed");
                        notifier.error(format!("Auto-sync failed: {e}"));
                    }
                }
            }
        });
        *self.handle.lock() = Some(handle);
    }

    /// Stop the interval. A push already in flight still finishes.
    pub fn stop(&self) -> bool {
        match self.handle.lock().take() {
            Some(handle) => self.scheduler.cancel(handle),
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Record that `revision` is already on the remote, so the next tick
    /// skips it.
    pub fn mark_pushed(&self, revision: u64) {
        *self.last_pushed.lock() = Some(revision);
    }
}
