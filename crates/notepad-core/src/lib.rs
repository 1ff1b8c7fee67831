//! # notepad-core
//!
//! A plain-text notepad with two ways of keeping a note:
//!
//! - **Share link**: the note is encoded into the URL fragment
//!   ([`codec`], [`link`]) and mirrored to a local cache ([`cache`]) with a
//!   debounced autosave.
//! - **Account sync**: the note lives in a remote store ([`store`]) under a
//!   login ([`auth`]). Every write goes through the [`reconciler`], which
//!   keeps exactly one record per account with last-write-wins semantics.
//!
//! The controllers in [`controller`] tie an editor buffer, timers, and
//! notifications to either persistence strategy.

pub mod auth;
pub mod autosave;
pub mod cache;
pub mod clock;
pub mod codec;
pub mod config;
pub mod constants;
pub mod controller;
pub mod editor;
pub mod error;
pub mod link;
pub mod notify;
pub mod reconciler;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod store;
pub mod sync;

pub use auth::{AccountService, CredentialPolicy, hash_credential, validate_credentials};
pub use autosave::{AutoSaveScheduler, AutoSyncScheduler};
pub use cache::{FileCache, LocalCache, MemoryCache};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock, system_clock};
pub use config::{ConfigError, NotepadConfig};
pub use controller::{LinkNotepad, LoadSource, SyncedNotepad};
pub use editor::{Clipboard, EditorBuffer, MemoryClipboard, SharedEditor, shared_editor};
pub use error::{
    CacheError, DecodeError, NotepadError, RemoteError, RemoteErrorKind, Result, StoreOp,
    ValidationError,
};
pub use link::LinkStateStore;
pub use notify::{Notification, Notifier, Severity};
pub use reconciler::{Reconciler, WriteEffect, WriteOutcome};
pub use scheduler::{Scheduler, TimerHandle};
pub use session::SessionContext;
pub use stats::Stats;
pub use store::{MemoryStore, RecordOrder, RemoteStore, SharedStore, SqliteStore};
pub use sync::SyncClient;
