//! The text buffer behind the editor surface.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::stats::{self, Stats};

/// Editor content with its derived statistics.
///
/// `revision` bumps on every change so background tasks can tell whether
/// the content moved since they last looked.
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    content: String,
    stats: Stats,
    revision: u64,
}

impl EditorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replace the content and recompute stats. Returns the new stats.
    pub fn set_content(&mut self, content: impl Into<String>) -> Stats {
        self.content = content.into();
        self.stats = stats::recompute(&self.content);
        self.revision += 1;
        self.stats
    }

    pub fn clear(&mut self) -> Stats {
        self.set_content(String::new())
    }

    /// Content and revision read under one lock.
    pub fn snapshot(&self) -> (String, u64) {
        (self.content.clone(), self.revision)
    }
}

/// Editor buffer shared between controllers and background timers.
pub type SharedEditor = Arc<Mutex<EditorBuffer>>;

pub fn shared_editor() -> SharedEditor {
    Arc::new(Mutex::new(EditorBuffer::new()))
}

/// Where "copy link" puts its text.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// In-process clipboard. `fail_with` makes the next write fail.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: RwLock<Option<String>>,
    failure: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<String> {
        self.text.read().clone()
    }

    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock() = Some(reason.into());
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        if let Some(reason) = self.failure.lock().take() {
            return Err(reason);
        }
        *self.text.write() = Some(text.to_string());
        Ok(())
    }
}
