//! Notepad defaults.
//!
//! Centralizes hardcoded values; most are overridable through
//! [`NotepadConfig`](crate::config::NotepadConfig).

use std::time::Duration;

/// Local cache key for the link notepad's content.
pub const STORAGE_KEY: &str = "notepad_content";

/// Quiet period before an edit is mirrored into the local cache.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// Interval between automatic pushes while logged in.
pub const AUTOSYNC_PERIOD: Duration = Duration::from_secs(30);

/// How long a notification stays visible.
pub const NOTIFICATION_DISMISS: Duration = Duration::from_millis(3000);

/// Notifications kept for inspection.
pub const MAX_NOTIFICATION_HISTORY: usize = 100;

pub const MIN_USERNAME_LEN: usize = 4;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Base URL for share links when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
