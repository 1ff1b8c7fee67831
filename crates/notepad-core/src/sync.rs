//! Account-scoped note sync client.
//!
//! Thin layer over a [`RemoteStore`] that routes every write through the
//! [`Reconciler`] and every read through its load selection.

use notepad_types::{Account, Note};
use tracing::info;

use crate::clock::SharedClock;
use crate::error::RemoteError;
use crate::reconciler::{Reconciler, WriteOutcome};
use crate::store::SharedStore;

/// Pushes and pulls an account's single note.
pub struct SyncClient {
    store: SharedStore,
    reconciler: Reconciler,
}

impl SyncClient {
    pub fn new(store: SharedStore, clock: SharedClock) -> Self {
        Self {
            store,
            reconciler: Reconciler::new(clock),
        }
    }

    /// Write `content` as the account's note, cleaning up duplicates.
    pub async fn push(
        &self,
        account: &Account,
        content: &str,
    ) -> Result<WriteOutcome, RemoteError> {
        let outcome = self
            .reconciler
            .reconcile_before_write(self.store.as_ref(), account.id, content)
            .await?;
        info!(
            account = %account.username,
            note = %outcome.record.id.short(),
            removed = outcome.effect.deleted().len(),
            "note pushed"
        );
        Ok(outcome)
    }

    /// Fetch the account's latest note, `None` if it has never saved.
    pub async fn pull(&self, account: &Account) -> Result<Option<Note>, RemoteError> {
        let record = self
            .reconciler
            .select_for_load(self.store.as_ref(), account.id)
            .await?;
        info!(account = %account.username, found = record.is_some(), "note pulled");
        Ok(record.map(Note::from))
    }
}
