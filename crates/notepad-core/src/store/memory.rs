//! In-memory store backend.
//!
//! Used for tests and offline runs. Rows keep their insertion sequence for
//! tie-breaking. Faults can be queued per operation to exercise partial
//! failures. Inserts require a registered account, as the SQLite schema's
//! foreign key does; `seed` bypasses that check.

use std::collections::HashMap;

use async_trait::async_trait;
use notepad_types::{Account, AccountId, NewAccount, NewNote, NoteId, NoteRecord};
use parking_lot::RwLock;

use super::{RecordOrder, RemoteStore, StoreResult};
use crate::error::{RemoteError, RemoteErrorKind, StoreOp};

#[derive(Debug, Clone)]
struct Row {
    seq: u64,
    record: NoteRecord,
}

#[derive(Debug, Default)]
struct Inner {
    notes: Vec<Row>,
    accounts: Vec<Account>,
    next_seq: u64,
    /// Pending injected failures, consumed one per call.
    faults: HashMap<StoreOp, Vec<RemoteErrorKind>>,
    calls: Vec<StoreOp>,
}

impl Inner {
    fn enter(&mut self, op: StoreOp) -> StoreResult<()> {
        self.calls.push(op);
        match self.faults.get_mut(&op).and_then(|q| q.pop()) {
            Some(kind) => Err(RemoteError::new(op, kind, "injected fault")),
            None => Ok(()),
        }
    }

    fn push_note(&mut self, record: NoteRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.notes.push(Row { seq, record });
    }
}

/// In-memory remote store.
///
/// Thread-safe via internal `RwLock`. All data is lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call to `op` fail with a network error.
    pub fn fail_next(&self, op: StoreOp) {
        self.fail_next_with(op, RemoteErrorKind::Network);
    }

    /// Make the next call to `op` fail with `kind`.
    pub fn fail_next_with(&self, op: StoreOp, kind: RemoteErrorKind) {
        self.inner.write().faults.entry(op).or_default().insert(0, kind);
    }

    /// Insert a row verbatim, bypassing fault injection. For setting up
    /// duplicate or back-dated records.
    pub fn seed(&self, record: NoteRecord) {
        self.inner.write().push_note(record);
    }

    /// Register an account verbatim.
    pub fn seed_account(&self, account: Account) {
        self.inner.write().accounts.push(account);
    }

    /// Snapshot of an account's rows in insertion order.
    pub fn records(&self, account_id: AccountId) -> Vec<NoteRecord> {
        self.inner
            .read()
            .notes
            .iter()
            .filter(|r| r.record.account_id == account_id)
            .map(|r| r.record.clone())
            .collect()
    }

    /// Every operation attempted so far, in order.
    pub fn calls(&self) -> Vec<StoreOp> {
        self.inner.read().calls.clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn query_by_account(
        &self,
        account_id: AccountId,
        order: RecordOrder,
    ) -> StoreResult<Vec<NoteRecord>> {
        let mut inner = self.inner.write();
        inner.enter(StoreOp::Query)?;

        let mut rows: Vec<&Row> = inner
            .notes
            .iter()
            .filter(|r| r.record.account_id == account_id)
            .collect();
        rows.sort_by(|a, b| {
            let (ka, kb) = match order {
                RecordOrder::CreatedDesc => (a.record.created_at, b.record.created_at),
                RecordOrder::UpdatedDesc => (a.record.updated_at, b.record.updated_at),
            };
            kb.cmp(&ka).then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|r| r.record.clone()).collect())
    }

    async fn insert(&self, note: NewNote) -> StoreResult<NoteRecord> {
        let mut inner = self.inner.write();
        inner.enter(StoreOp::Insert)?;

        if !inner.accounts.iter().any(|a| a.id == note.account_id) {
            return Err(RemoteError::constraint(
                StoreOp::Insert,
                format!("unknown account {}", note.account_id),
            ));
        }

        let record = NoteRecord {
            id: NoteId::new(),
            account_id: note.account_id,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        };
        inner.push_note(record.clone());
        Ok(record)
    }

    async fn update_by_id(
        &self,
        id: NoteId,
        content: &str,
        updated_at: u64,
    ) -> StoreResult<NoteRecord> {
        let mut inner = self.inner.write();
        inner.enter(StoreOp::Update)?;

        let row = inner
            .notes
            .iter_mut()
            .find(|r| r.record.id == id)
            .ok_or_else(|| RemoteError::not_found(StoreOp::Update, format!("note {id}")))?;
        row.record.content = content.to_string();
        row.record.updated_at = updated_at;
        Ok(row.record.clone())
    }

    async fn delete_by_ids(&self, ids: &[NoteId]) -> StoreResult<usize> {
        let mut inner = self.inner.write();
        inner.enter(StoreOp::Delete)?;

        let before = inner.notes.len();
        inner.notes.retain(|r| !ids.contains(&r.record.id));
        Ok(before - inner.notes.len())
    }

    async fn find_account(&self, username: &str) -> StoreResult<Option<Account>> {
        let mut inner = self.inner.write();
        inner.enter(StoreOp::FindAccount)?;
        Ok(inner.accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut inner = self.inner.write();
        inner.enter(StoreOp::CreateAccount)?;

        if inner.accounts.iter().any(|a| a.username == account.username) {
            return Err(RemoteError::constraint(
                StoreOp::CreateAccount,
                format!("username '{}' already exists", account.username),
            ));
        }
        let created = Account {
            id: AccountId::new(),
            username: account.username,
            credential_hash: account.credential_hash,
            created_at: account.created_at,
        };
        inner.accounts.push(created.clone());
        Ok(created)
    }
}
