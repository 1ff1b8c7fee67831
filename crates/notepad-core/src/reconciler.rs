//! Single-record last-write-wins reconciliation.
//!
//! The remote store may hold several notes for one account (old bugs, racing
//! sessions). Every successful write converges it back to exactly one: the
//! most recently created record is kept and overwritten, every other record
//! is deleted. Loads never clean up; duplicates can linger until the next
//! write.
//!
//! # Write sequence
//!
//! ```text
//! query(created desc) ──► 0 records ──► insert
//!                     └─► n records ──► delete(stale) ──► update(newest)
//! ```
//!
//! The delete and the update are separate store calls with no rollback. If
//! the update fails after the delete succeeded, the duplicates stay gone and
//! the kept record keeps its old content. If another session removed the
//! kept record in between, the account is left with no note at all.

use notepad_types::{AccountId, NewNote, NoteId, NoteRecord};
use tracing::{debug, instrument, warn};

use crate::clock::SharedClock;
use crate::error::RemoteError;
use crate::store::{RecordOrder, RemoteStore};

/// What a write does to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteEffect {
    /// No record existed; a new one is created.
    Insert { account_id: AccountId, content: String, at: u64 },
    /// The newest-created record is overwritten and all others removed.
    Update {
        keep: NoteId,
        content: String,
        at: u64,
        delete: Vec<NoteId>,
    },
}

impl WriteEffect {
    /// Ids this effect removes.
    pub fn deleted(&self) -> &[NoteId] {
        match self {
            WriteEffect::Insert { .. } => &[],
            WriteEffect::Update { delete, .. } => delete,
        }
    }
}

/// Outcome of an applied write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub effect: WriteEffect,
    /// The surviving record after the write.
    pub record: NoteRecord,
}

/// Plan a write against `records`, which must be ordered newest-created first.
pub fn plan(
    account_id: AccountId,
    records: &[NoteRecord],
    new_content: &str,
    now: u64,
) -> WriteEffect {
    match records.split_first() {
        None => WriteEffect::Insert {
            account_id,
            content: new_content.to_string(),
            at: now,
        },
        Some((newest, stale)) => WriteEffect::Update {
            keep: newest.id,
            content: new_content.to_string(),
            at: now,
            delete: stale.iter().map(|r| r.id).collect(),
        },
    }
}

/// Applies the keep-newest, delete-the-rest policy against a store.
pub struct Reconciler {
    clock: SharedClock,
}

impl Reconciler {
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// Write `new_content` as the account's only note.
    #[instrument(skip(self, store, new_content), fields(len = new_content.len()))]
    pub async fn reconcile_before_write(
        &self,
        store: &dyn RemoteStore,
        account_id: AccountId,
        new_content: &str,
    ) -> Result<WriteOutcome, RemoteError> {
        let records = store
            .query_by_account(account_id, RecordOrder::CreatedDesc)
            .await?;
        let effect = plan(account_id, &records, new_content, self.clock.now_millis());

        let record = match &effect {
            WriteEffect::Insert { account_id, content, at } => {
                debug!("no existing note, inserting");
                store.insert(NewNote::new(*account_id, content.clone(), *at)).await?
            }
            WriteEffect::Update { keep, content, at, delete } => {
                if !delete.is_empty() {
                    warn!(count = delete.len(), "removing duplicate notes");
                    store.delete_by_ids(delete).await?;
                }
                store.update_by_id(*keep, content, *at).await?
            }
        };

        Ok(WriteOutcome { effect, record })
    }

    /// The most recently updated note for the account, if any.
    #[instrument(skip(self, store))]
    pub async fn select_for_load(
        &self,
        store: &dyn RemoteStore,
        account_id: AccountId,
    ) -> Result<Option<NoteRecord>, RemoteError> {
        let records = store
            .query_by_account(account_id, RecordOrder::UpdatedDesc)
            .await?;
        if records.len() > 1 {
            debug!(count = records.len(), "duplicate notes present on load");
        }
        Ok(records.into_iter().next())
    }
}
