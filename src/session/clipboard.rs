//! Clipboard collaborator.

use std::sync::Mutex;
use thiserror::Error;

/// Clipboard write failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// No clipboard is reachable.
    #[error("clipboard access is unavailable in this context")]
    Unavailable,
    /// The write was refused.
    #[error("failed to copy to clipboard: {0}")]
    WriteFailed(String),
}

/// Somewhere copied text can be written.
pub trait ClipboardSink: Send + Sync {
    /// Replaces the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Keeps the last copied text in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last copied text.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}
