//! User-visible notices
//!
//! Snapshot lookups that miss are not errors, but the user should hear
//! about them. The pipeline reports through a `Notifier` so the host decides
//! how a notice is shown.

use std::sync::Mutex;

/// Longest key prefix shown in a cloud notice
const KEY_PREVIEW_CHARS: usize = 8;

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A local key was not present in the key-value store
    LocalNotFound { key: String },
    /// A remote snapshot could not be fetched or parsed
    CloudNotFound { key_preview: String },
}

impl Notice {
    pub fn local_not_found(key: impl Into<String>) -> Self {
        Self::LocalNotFound { key: key.into() }
    }

    /// Build a cloud notice, truncating the key for display.
    pub fn cloud_not_found(key: &str) -> Self {
        Self::CloudNotFound {
            key_preview: truncate_key(key),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalNotFound { key } => write!(
                f,
                "The diagram ‘{}’ was not found in your browser's local storage.",
                key
            ),
            Self::CloudNotFound { key_preview } => write!(
                f,
                "The diagram ‘{}’ was not found in the cloud storage.",
                key_preview
            ),
        }
    }
}

/// First 8 characters of `key`, plus `…` when it was longer.
pub fn truncate_key(key: &str) -> String {
    let mut chars = key.chars();
    let head: String = chars.by_ref().take(KEY_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

/// Sink for user-visible notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Reports notices through `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!("{}", notice);
    }
}

/// Keeps every notice for later inspection (testing).
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
