//! End-to-end controller tests: link notepad with a file cache, synced
//! notepad with timers on tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use notepad_core::{
    FileCache, LinkNotepad, LinkStateStore, LoadSource, LocalCache, ManualClock, MemoryCache,
    MemoryStore, NotepadConfig, NotepadError, Severity, SqliteStore, SyncedNotepad, codec,
};

const BASE: &str = "https://notes.example/";

fn link_notepad(url: &str, cache: Arc<dyn LocalCache>) -> LinkNotepad {
    LinkNotepad::new(
        &NotepadConfig::default(),
        LinkStateStore::from_url(url),
        cache,
        Arc::new(ManualClock::new(0)),
    )
}

#[test]
fn test_saved_link_opens_elsewhere() {
    let mut writer = link_notepad(BASE, Arc::new(MemoryCache::new()));
    writer.editor().lock().set_content("Grocery list:\n- 우유\n- 🍞");
    let href = writer.save().unwrap();

    // A different device: empty cache, same link.
    let mut reader = link_notepad(&href, Arc::new(MemoryCache::new()));
    assert_eq!(reader.open().unwrap(), LoadSource::Link);
    assert_eq!(reader.content(), "Grocery list:\n- 우유\n- 🍞");
    assert_eq!(reader.stats().lines, 3);
}

#[test]
fn test_corrupt_link_falls_back_to_cache() {
    let cache = Arc::new(MemoryCache::new());
    cache.set("notepad_content", "from cache").unwrap();

    let mut pad = link_notepad(&format!("{BASE}#%zz"), cache);
    let err = pad.open().unwrap_err();
    assert!(matches!(err, NotepadError::Decode(_)));
    assert_eq!(pad.content(), "from cache");

    let shown = pad.notifier().current().unwrap();
    assert_eq!(shown.severity, Severity::Error);
    assert_eq!(shown.message, format!("Failed to load note: {err}"));
}

#[test]
fn test_link_notepad_with_file_cache_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cache = Arc::new(FileCache::open(dir.path()).unwrap());
        let mut pad = link_notepad(BASE, cache);
        pad.editor().lock().set_content("remember me");
        pad.save().unwrap();
    }

    let cache = Arc::new(FileCache::open(dir.path()).unwrap());
    let mut pad = link_notepad(BASE, cache);
    assert_eq!(pad.open().unwrap(), LoadSource::Cache);
    assert_eq!(pad.content(), "remember me");
}

#[tokio::test(start_paused = true)]
async fn test_typing_autosaves_once_after_quiet_period() {
    let cache = Arc::new(MemoryCache::new());
    let pad = link_notepad(BASE, cache.clone());

    let mut text = String::new();
    for c in "draft".chars() {
        text.push(c);
        pad.input(text.clone());
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    assert!(cache.get("notepad_content").unwrap().is_none());

    tokio::time::sleep(Duration::from_millis(801)).await;
    assert_eq!(cache.get("notepad_content").unwrap().as_deref(), Some("draft"));
    assert!(!pad.location().has_fragment());
}

#[tokio::test(start_paused = true)]
async fn test_clear_then_autosave_never_writes_empty() {
    let cache = Arc::new(MemoryCache::new());
    let mut pad = link_notepad(BASE, cache.clone());

    pad.input("temporary");
    pad.clear().unwrap();
    pad.input("");
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(cache.is_empty());
}

#[test]
fn test_navigating_between_links() {
    let first = format!("{BASE}#{}", codec::encode("first"));
    let second = format!("{BASE}#{}", codec::encode("second"));

    let mut pad = link_notepad(&first, Arc::new(MemoryCache::new()));
    pad.open().unwrap();
    assert_eq!(pad.content(), "first");

    assert_eq!(pad.navigate(&second).unwrap(), Some(LoadSource::Link));
    assert_eq!(pad.content(), "second");
}

fn synced(store: Arc<MemoryStore>) -> SyncedNotepad {
    SyncedNotepad::new(
        &NotepadConfig::default(),
        store,
        Arc::new(ManualClock::new(1_000)),
    )
}

#[tokio::test(start_paused = true)]
async fn test_autosync_pushes_edits_while_logged_in() {
    let store = Arc::new(MemoryStore::new());
    let mut pad = synced(store.clone());
    let session = pad.login("amy1", "secret1").await.unwrap();

    pad.input("typed but not saved");
    tokio::time::sleep(Duration::from_secs(31)).await;

    let records = store.records(session.account.id);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "typed but not saved");
}

#[tokio::test(start_paused = true)]
async fn test_autosync_stops_after_logout() {
    let store = Arc::new(MemoryStore::new());
    let mut pad = synced(store.clone());
    let session = pad.login("amy1", "secret1").await.unwrap();
    pad.input("before logout");
    pad.save().await.unwrap();
    let calls_at_logout = {
        pad.logout();
        store.calls().len()
    };

    pad.input("typed after logout");
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(store.calls().len(), calls_at_logout);
    let records = store.records(session.account.id);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "before logout");
}

#[tokio::test(start_paused = true)]
async fn test_explicit_save_is_not_repeated_by_autosync() {
    let store = Arc::new(MemoryStore::new());
    let mut pad = synced(store.clone());
    pad.login("amy1", "secret1").await.unwrap();
    pad.input("saved by hand");
    pad.save().await.unwrap();
    let calls = store.calls().len();

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(store.calls().len(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_synced_notepad_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let config = NotepadConfig::default();

    {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let mut pad = SyncedNotepad::new(&config, store, Arc::new(ManualClock::new(1)));
        pad.login("amy1", "secret1").await.unwrap();
        pad.input("stored in sqlite");
        pad.save().await.unwrap();
        pad.logout();
    }

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let mut pad = SyncedNotepad::new(&config, store, Arc::new(ManualClock::new(2)));
    pad.login("amy1", "secret1").await.unwrap();
    assert_eq!(pad.content(), "stored in sqlite");
}
