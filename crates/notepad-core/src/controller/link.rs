//! Share-link notepad.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{LoadSource, failure_message};
use crate::autosave::AutoSaveScheduler;
use crate::cache::LocalCache;
use crate::clock::SharedClock;
use crate::config::NotepadConfig;
use crate::editor::{Clipboard, SharedEditor, shared_editor};
use crate::error::{NotepadError, Result, ValidationError};
use crate::link::LinkStateStore;
use crate::notify::Notifier;
use crate::scheduler::Scheduler;
use crate::stats::Stats;

/// Notepad whose saved state is the link itself.
///
/// The fragment is the source of truth when present. The local cache
/// holds the last saved or autosaved content for links without one.
pub struct LinkNotepad {
    editor: SharedEditor,
    location: LinkStateStore,
    cache: Arc<dyn LocalCache>,
    storage_key: String,
    autosave: AutoSaveScheduler,
    notifier: Notifier,
}

impl LinkNotepad {
    pub fn new(
        config: &NotepadConfig,
        location: LinkStateStore,
        cache: Arc<dyn LocalCache>,
        clock: SharedClock,
    ) -> Self {
        let editor = shared_editor();
        let autosave = AutoSaveScheduler::new(
            Arc::new(Scheduler::new()),
            Arc::clone(&editor),
            Arc::clone(&cache),
            config.storage_key.clone(),
            config.autosave_delay(),
        );
        Self {
            editor,
            location,
            cache,
            storage_key: config.storage_key.clone(),
            autosave,
            notifier: Notifier::new(clock, config.notification_dismiss()),
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

    pub fn location(&self) -> &LinkStateStore {
        &self.location
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn autosave(&self) -> &AutoSaveScheduler {
        &self.autosave
    }

    /// Load content from the fragment, or from the cache when there is none.
    ///
    /// A fragment that fails to decode raises an error notification and
    /// falls back to whatever the cache holds; the decode error is still
    /// returned.
    #[instrument(skip(self))]
    pub fn open(&mut self) -> Result<LoadSource> {
        match self.location.read_content() {
            Ok(Some(content)) => {
                self.editor.lock().set_content(content);
                self.notifier.success("Note loaded from link");
                Ok(LoadSource::Link)
            }
            Ok(None) => match self.cache.get(&self.storage_key) {
                Ok(Some(content)) if !content.is_empty() => {
                    self.editor.lock().set_content(content);
                    self.notifier.success("Restored note from local cache");
                    Ok(LoadSource::Cache)
                }
                Ok(_) => Ok(LoadSource::Empty),
                Err(e) => Err(self.fail("Failed to load note", e.into())),
            },
            Err(e) => {
                warn!(error = %e, "fragment did not decode, trying cache");
                let err = self.fail("Failed to load note", e.into());
                let cached = self.cache.get(&self.storage_key).ok().flatten();
                if let Some(content) = cached.filter(|c| !c.is_empty()) {
                    self.editor.lock().set_content(content);
                }
                Err(err)
            }
        }
    }

    /// Replace the buffer with typed text and restart the autosave timer.
    pub fn input(&self, text: impl Into<String>) -> Stats {
        let stats = self.editor.lock().set_content(text);
        self.autosave.touch();
        stats
    }

    /// Encode the trimmed buffer into the fragment and mirror it to the
    /// cache. Returns the new share link.
    #[instrument(skip(self))]
    pub fn save(&mut self) -> Result<String> {
        let content = self.editor.lock().content().trim().to_string();
        if content.is_empty() {
            return Err(self.fail("Failed to save note", ValidationError::EmptyContent.into()));
        }

        self.location.write_content(&content);
        if let Err(e) = self.cache.set(&self.storage_key, &content) {
            return Err(self.fail("Failed to save note", e.into()));
        }

        let href = self.location.href();
        info!(chars = content.chars().count(), link_len = href.len(), "saved to link");
        self.notifier.success("Note saved to link");
        Ok(href)
    }

    /// Put the share link on the first clipboard that accepts it.
    pub fn copy_link(&self, clipboards: &[&dyn Clipboard]) -> Result<String> {
        if !self.location.has_fragment() {
            return Err(self.fail("Failed to copy link", ValidationError::NothingSaved.into()));
        }

        let href = self.location.href();
        let mut last_error = String::from("no clipboard available");
        for clipboard in clipboards {
            match clipboard.write_text(&href) {
                Ok(()) => {
                    self.notifier.success("Link copied to clipboard");
                    return Ok(href);
                }
                Err(e) => {
                    warn!(error = %e, "clipboard write failed");
                    last_error = e;
                }
            }
        }
        Err(self.fail("Failed to copy link", NotepadError::Clipboard(last_error)))
    }

    /// Empty the buffer, drop the fragment, and forget the cached copy.
    ///
    /// Asking the user to confirm is the caller's job.
    pub fn clear(&mut self) -> Result<()> {
        self.editor.lock().clear();
        self.location.clear();
        if let Err(e) = self.cache.remove(&self.storage_key) {
            return Err(self.fail("Failed to clear note", e.into()));
        }
        self.notifier.success("Note cleared");
        Ok(())
    }

    /// Follow a location change. Reloads only when the fragment changed.
    pub fn navigate(&mut self, url: &str) -> Result<Option<LoadSource>> {
        if !self.location.navigate(url) {
            return Ok(None);
        }
        self.open().map(Some)
    }

    fn fail(&self, action: &str, err: NotepadError) -> NotepadError {
        self.notifier.error(failure_message(action, &err));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::clock::ManualClock;
    use crate::codec;
    use crate::editor::MemoryClipboard;
    use crate::notify::Severity;

    const BASE: &str = "https://notes.example/";

    fn notepad_at(url: &str) -> (Arc<MemoryCache>, LinkNotepad) {
        let cache = Arc::new(MemoryCache::new());
        let pad = LinkNotepad::new(
            &NotepadConfig::default(),
            LinkStateStore::from_url(url),
            cache.clone(),
            Arc::new(ManualClock::new(0)),
        );
        (cache, pad)
    }

    fn last_severity(pad: &LinkNotepad) -> Severity {
        pad.notifier().last().unwrap().severity
    }

    #[test]
    fn test_open_from_fragment() {
        let url = format!("{BASE}#{}", codec::encode("안녕하세요"));
        let (_cache, mut pad) = notepad_at(&url);
        assert_eq!(pad.open().unwrap(), LoadSource::Link);
        assert_eq!(pad.content(), "안녕하세요");
        assert_eq!(pad.stats().chars, 5);
        assert_eq!(last_severity(&pad), Severity::Success);
    }

    #[test]
    fn test_open_without_fragment_uses_cache() {
        let (cache, mut pad) = notepad_at(BASE);
        cache.set("notepad_content", "cached").unwrap();
        assert_eq!(pad.open().unwrap(), LoadSource::Cache);
        assert_eq!(pad.content(), "cached");
    }

    #[test]
    fn test_open_with_nothing_is_silent() {
        let (_cache, mut pad) = notepad_at(BASE);
        assert_eq!(pad.open().unwrap(), LoadSource::Empty);
        assert!(pad.notifier().last().is_none());
    }

    #[test]
    fn test_save_trims_and_sets_fragment() {
        let (cache, mut pad) = notepad_at(BASE);
        pad.editor().lock().set_content("  hello  \n");
        let href = pad.save().unwrap();

        assert_eq!(href, format!("{BASE}#{}", codec::encode("hello")));
        assert_eq!(cache.get("notepad_content").unwrap().as_deref(), Some("hello"));
        assert_eq!(pad.location().read_content().unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_save_blank_is_rejected() {
        let (cache, mut pad) = notepad_at(BASE);
        pad.editor().lock().set_content("   \n\t");
        assert!(matches!(
            pad.save(),
            Err(NotepadError::Validation(ValidationError::EmptyContent))
        ));
        assert!(!pad.location().has_fragment());
        assert!(cache.is_empty());
        let note = pad.notifier().last().unwrap();
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.message, "Nothing to save");
    }

    #[test]
    fn test_copy_link_requires_saved_fragment() {
        let (_cache, mut pad) = notepad_at(BASE);
        let clipboard = MemoryClipboard::new();
        assert!(matches!(
            pad.copy_link(&[&clipboard]),
            Err(NotepadError::Validation(ValidationError::NothingSaved))
        ));
        assert!(clipboard.text().is_none());

        pad.editor().lock().set_content("note");
        let href = pad.save().unwrap();
        assert_eq!(pad.copy_link(&[&clipboard]).unwrap(), href);
        assert_eq!(clipboard.text(), Some(href));
    }

    #[test]
    fn test_copy_link_falls_back_to_second_clipboard() {
        let (_cache, mut pad) = notepad_at(BASE);
        pad.editor().lock().set_content("note");
        pad.save().unwrap();

        let primary = MemoryClipboard::new();
        primary.fail_with("permission denied");
        let fallback = MemoryClipboard::new();
        pad.copy_link(&[&primary, &fallback]).unwrap();
        assert!(primary.text().is_none());
        assert!(fallback.text().is_some());
        assert_eq!(last_severity(&pad), Severity::Success);

        let broken = MemoryClipboard::new();
        broken.fail_with("denied");
        assert!(matches!(
            pad.copy_link(&[&broken]),
            Err(NotepadError::Clipboard(msg)) if msg == "denied"
        ));
        assert_eq!(last_severity(&pad), Severity::Error);
    }

    #[test]
    fn test_clear_removes_everything() {
        let (cache, mut pad) = notepad_at(BASE);
        pad.editor().lock().set_content("note");
        pad.save().unwrap();

        pad.clear().unwrap();
        assert_eq!(pad.content(), "");
        assert!(!pad.location().has_fragment());
        assert_eq!(pad.location().href(), BASE);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_navigate_reloads_on_fragment_change() {
        let (_cache, mut pad) = notepad_at(BASE);
        let url = format!("{BASE}#{}", codec::encode("from elsewhere"));

        assert_eq!(pad.navigate(&url).unwrap(), Some(LoadSource::Link));
        assert_eq!(pad.content(), "from elsewhere");
        assert_eq!(pad.navigate(&url).unwrap(), None);
    }
}
