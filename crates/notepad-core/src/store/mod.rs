//! Remote record store collaborator.
//!
//! Two logical tables: accounts (unique username) and notes (foreign key
//! to accounts). The sync layer consumes notes through four operations:
//! query-by-account, insert, update-by-id, delete-by-ids. Nothing here
//! enforces one note per account; that is the reconciler's job.
//!
//! Ordering contract for [`RemoteStore::query_by_account`]: newest first
//! by the requested timestamp, ties broken by insertion sequence with the
//! most recent insertion first.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use async_trait::async_trait;
use notepad_types::{Account, AccountId, NewAccount, NewNote, NoteId, NoteRecord};

use crate::error::RemoteError;

/// Result type for store calls.
pub type StoreResult<T> = Result<T, RemoteError>;

/// Which timestamp to order query results by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrder {
    CreatedDesc,
    UpdatedDesc,
}

/// Account-scoped note storage plus account lookup.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All notes for an account, ordered per [`RecordOrder`].
    async fn query_by_account(
        &self,
        account_id: AccountId,
        order: RecordOrder,
    ) -> StoreResult<Vec<NoteRecord>>;

    /// Insert a new note row and return it with its assigned id.
    async fn insert(&self, note: NewNote) -> StoreResult<NoteRecord>;

    /// Overwrite content and `updated_at` of an existing row.
    async fn update_by_id(
        &self,
        id: NoteId,
        content: &str,
        updated_at: u64,
    ) -> StoreResult<NoteRecord>;

    /// Delete rows by id. Returns how many were removed.
    async fn delete_by_ids(&self, ids: &[NoteId]) -> StoreResult<usize>;

    /// Look up an account by username.
    async fn find_account(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Create an account. Duplicate usernames fail with a constraint error.
    async fn create_account(&self, account: NewAccount) -> StoreResult<Account>;
}

/// Shared store handle.
pub type SharedStore = Arc<dyn RemoteStore>;
