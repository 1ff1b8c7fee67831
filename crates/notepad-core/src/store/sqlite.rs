//! SQLite store backend.
//!
//! Two tables mirror the remote collaborator: `accounts` and `notes`.
//! Foreign keys are enforced; one-note-per-account is not.

use std::path::Path;

use async_trait::async_trait;
use notepad_types::{Account, AccountId, NewAccount, NewNote, NoteId, NoteRecord};
use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use super::{RecordOrder, RemoteStore, StoreResult};
use crate::error::{RemoteError, StoreOp};

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    credential_hash TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_notes_account ON notes(account_id, created_at DESC);
"#;

const NOTE_COLUMNS: &str = "id, account_id, content, created_at, updated_at";

/// SQLite-backed remote store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a row verbatim. For setting up duplicate or back-dated records.
    pub fn seed(&self, record: &NoteRecord) -> StoreResult<()> {
        self.conn
            .lock()
            .execute(
                "INSERT INTO notes (id, account_id, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.id.to_string(),
                    record.account_id.to_string(),
                    record.content,
                    record.created_at as i64,
                    record.updated_at as i64,
                ],
            )
            .map_err(map_err(StoreOp::Insert))?;
        Ok(())
    }

    fn fetch_note(conn: &Connection, id: NoteId) -> rusqlite::Result<Option<NoteRecord>> {
        conn.query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
            params![id.to_string()],
            row_to_record,
        )
        .optional()
    }
}

#[async_trait]
impl RemoteStore for SqliteStore {
    async fn query_by_account(
        &self,
        account_id: AccountId,
        order: RecordOrder,
    ) -> StoreResult<Vec<NoteRecord>> {
        let column = match order {
            RecordOrder::CreatedDesc => "created_at",
            RecordOrder::UpdatedDesc => "updated_at",
        };
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE account_id = ?1
             ORDER BY {column} DESC, rowid DESC"
        );

        let conn = self.conn.lock();
        query_notes(&conn, &sql, account_id).map_err(map_err(StoreOp::Query))
    }

    async fn insert(&self, note: NewNote) -> StoreResult<NoteRecord> {
        let record = NoteRecord {
            id: NoteId::new(),
            account_id: note.account_id,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        };
        self.conn
            .lock()
            .execute(
                "INSERT INTO notes (id, account_id, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.id.to_string(),
                    record.account_id.to_string(),
                    record.content,
                    record.created_at as i64,
                    record.updated_at as i64,
                ],
            )
            .map_err(map_err(StoreOp::Insert))?;
        Ok(record)
    }

    async fn update_by_id(
        &self,
        id: NoteId,
        content: &str,
        updated_at: u64,
    ) -> StoreResult<NoteRecord> {
        let conn = self.conn.lock();
        let changed = conn
            .execute(
                "UPDATE notes SET content = ?1, updated_at = ?2 WHERE id = ?3",
                params![content, updated_at as i64, id.to_string()],
            )
            .map_err(map_err(StoreOp::Update))?;
        if changed == 0 {
            return Err(RemoteError::not_found(StoreOp::Update, format!("note {id}")));
        }
        Self::fetch_note(&conn, id)
            .map_err(map_err(StoreOp::Update))?
            .ok_or_else(|| RemoteError::not_found(StoreOp::Update, format!("note {id}")))
    }

    async fn delete_by_ids(&self, ids: &[NoteId]) -> StoreResult<usize> {
        delete_all(&mut self.conn.lock(), ids).map_err(map_err(StoreOp::Delete))
    }

    async fn find_account(&self, username: &str) -> StoreResult<Option<Account>> {
        self.conn
            .lock()
            .query_row(
                "SELECT id, username, credential_hash, created_at FROM accounts WHERE username = ?1",
                params![username],
                row_to_account,
            )
            .optional()
            .map_err(map_err(StoreOp::FindAccount))
    }

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let created = Account {
            id: AccountId::new(),
            username: account.username,
            credential_hash: account.credential_hash,
            created_at: account.created_at,
        };
        self.conn
            .lock()
            .execute(
                "INSERT INTO accounts (id, username, credential_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    created.id.to_string(),
                    created.username,
                    created.credential_hash,
                    created.created_at as i64,
                ],
            )
            .map_err(map_err(StoreOp::CreateAccount))?;
        Ok(created)
    }
}

fn query_notes(
    conn: &Connection,
    sql: &str,
    account_id: AccountId,
) -> rusqlite::Result<Vec<NoteRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![account_id.to_string()], row_to_record)?;
    rows.collect()
}

fn delete_all(conn: &mut Connection, ids: &[NoteId]) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    let mut removed = 0;
    {
        let mut stmt = tx.prepare("DELETE FROM notes WHERE id = ?1")?;
        for id in ids {
            removed += stmt.execute(params![id.to_string()])?;
        }
    }
    tx.commit()?;
    Ok(removed)
}

fn map_err(op: StoreOp) -> impl Fn(rusqlite::Error) -> RemoteError {
    move |e| match &e {
        rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation => {
            RemoteError::constraint(op, e.to_string())
        }
        _ => RemoteError::backend(op, e.to_string()),
    }
}

fn parse_id<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<NoteRecord> {
    Ok(NoteRecord {
        id: parse_id(row, 0)?,
        account_id: parse_id(row, 1)?,
        content: row.get(2)?,
        created_at: row.get::<_, i64>(3)? as u64,
        updated_at: row.get::<_, i64>(4)? as u64,
    })
}

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: parse_id(row, 0)?,
        username: row.get(1)?,
        credential_hash: row.get(2)?,
        created_at: row.get::<_, i64>(3)? as u64,
    })
}
