//! Share-link location state.
//!
//! Models the browser location as far as the notepad cares: a base URL
//! plus an optional fragment holding the encoded note. Absence of a
//! fragment means "look in the local cache instead".

use crate::codec;
use crate::error::DecodeError;

/// The current share-link location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStateStore {
    base_url: String,
    fragment: Option<String>,
}

impl LinkStateStore {
    /// Start at `base_url` with no fragment. Any `#...` suffix is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let (base, _) = split_url(&base_url.into());
        Self {
            base_url: base,
            fragment: None,
        }
    }

    /// Parse a full URL, keeping everything after the first `#` as the fragment.
    pub fn from_url(url: &str) -> Self {
        let (base_url, fragment) = split_url(url);
        Self { base_url, fragment }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The raw fragment token, `None` when absent or empty.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn has_fragment(&self) -> bool {
        self.fragment.is_some()
    }

    /// Replace the fragment with an already-encoded token.
    pub fn set_fragment(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.fragment = if token.is_empty() { None } else { Some(token) };
    }

    /// Encode `content` and store it as the fragment.
    pub fn write_content(&mut self, content: &str) {
        self.set_fragment(codec::encode(content));
    }

    /// Decode the fragment. `Ok(None)` when there is no fragment.
    pub fn read_content(&self) -> Result<Option<String>, DecodeError> {
        self.fragment.as_deref().map(codec::decode).transpose()
    }

    /// Drop the fragment.
    pub fn clear(&mut self) {
        self.fragment = None;
    }

    /// Full URL, as a browser's `location.href` would show it.
    pub fn href(&self) -> String {
        match &self.fragment {
            Some(f) => format!("{}#{}", self.base_url, f),
            None => self.base_url.clone(),
        }
    }

    /// Move to a new URL (hash change, back/forward). Returns true when the
    /// fragment changed.
    pub fn navigate(&mut self, url: &str) -> bool {
        let (base_url, fragment) = split_url(url);
        let changed = fragment != self.fragment;
        if !base_url.is_empty() {
            self.base_url = base_url;
        }
        self.fragment = fragment;
        changed
    }
}

fn split_url(url: &str) -> (String, Option<String>) {
    match url.split_once('#') {
        Some((base, frag)) if !frag.is_empty() => (base.to_string(), Some(frag.to_string())),
        Some((base, _)) => (base.to_string(), None),
        None => (url.to_string(), None),
    }
}
