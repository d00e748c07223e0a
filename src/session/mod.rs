//! The caller-owned session.
//!
//! A [`Session`] holds the current payload and the two independent
//! background tasks tied to it: the OTP refresh ticker and at most one
//! scan. There is a single writer for the payload; replacing it stops
//! the refresh of the old one.

mod clipboard;
mod refresh;

pub use clipboard::{ClipboardError, ClipboardSink, MemoryClipboard};
pub use refresh::CodeSnapshot;

use crate::capture::FrameSource;
use crate::classify::classify_with;
use crate::config::FileConfig;
use crate::error::ParseError;
use crate::otp::OtpPolicy;
use crate::payload::ParsedPayload;
use crate::scan::{ScanHandle, ScanLoop, ScanOutcome};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Errors from the copy actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No payload is loaded.
    #[error("nothing parsed yet")]
    NothingParsed,
    /// The payload carries no OTP parameters.
    #[error("the current payload is not a one-time password")]
    NotOtp,
    /// The code could not be computed.
    #[error("no code available")]
    NoCode,
    /// `with_clipboard` was never called.
    #[error("no clipboard configured")]
    NoClipboard,
    /// The clipboard write failed.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Current payload, its refreshed code and the active scan.
///
/// Starting a refresh or a scan spawns a tokio task, so those operations
/// must run inside a runtime.
pub struct Session {
    policy: OtpPolicy,
    refresh_tick: Duration,
    payload: Option<ParsedPayload>,
    code: watch::Receiver<CodeSnapshot>,
    refresh: Option<JoinHandle<()>>,
    scan: Option<ScanHandle>,
    clipboard: Option<Arc<dyn ClipboardSink>>,
}

impl Session {
    /// Creates an empty session using the OTP policy and refresh tick from `config`.
    pub fn new(config: &FileConfig) -> Self {
        let (_, code) = watch::channel(CodeSnapshot::default());
        Self {
            policy: config.otp.clone(),
            refresh_tick: config.refresh.tick(),
            payload: None,
            code,
            refresh: None,
            scan: None,
            clipboard: None,
        }
    }

    /// Sets the target of the copy actions.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// The current payload.
    pub fn payload(&self) -> Option<&ParsedPayload> {
        self.payload.as_ref()
    }

    /// Latest code snapshot. Empty when no OTP payload is loaded.
    pub fn code(&self) -> CodeSnapshot {
        self.code.borrow().clone()
    }

    /// Receiver for code updates. It closes when the payload is replaced
    /// or cleared.
    pub fn subscribe_code(&self) -> watch::Receiver<CodeSnapshot> {
        self.code.clone()
    }

    /// Replaces the current payload and restarts the code refresh.
    pub fn apply(&mut self, payload: ParsedPayload) {
        self.stop_refresh();

        if let Some(params) = payload.otp() {
            let (tx, rx) = watch::channel(CodeSnapshot::at(params, Utc::now()));
            self.refresh = Some(refresh::spawn_refresh(params.clone(), self.refresh_tick, tx));
            self.code = rx;
        }

        tracing::info!(format = %payload.format(), summary = payload.summary(), "Payload loaded");
        self.payload = Some(payload);
    }

    /// Clears the payload after a failed parse. Returns the message to show.
    pub fn reset_with_error(&mut self, error: &ParseError) -> String {
        self.stop_refresh();
        self.payload = None;
        tracing::info!(error = %error, "Payload cleared");
        error.to_string()
    }

    /// Classifies pasted or decoded text and loads the result. A failure
    /// clears whatever was loaded before.
    pub fn parse_text(&mut self, text: &str) -> Result<&ParsedPayload, ParseError> {
        match classify_with(text, &self.policy) {
            Ok(payload) => {
                self.apply(payload);
                self.payload.as_ref().ok_or(ParseError::PayloadEmpty)
            }
            Err(error) => {
                self.reset_with_error(&error);
                Err(error)
            }
        }
    }

    /// Starts scanning, cancelling any scan already running.
    pub fn start_scan<S>(&mut self, scanner: &ScanLoop, source: S)
    where
        S: FrameSource + 'static,
    {
        self.cancel_scan();
        self.scan = Some(scanner.clone().with_policy(self.policy.clone()).spawn(source));
    }

    /// Cancels the running scan, if any.
    pub fn cancel_scan(&mut self) {
        if let Some(handle) = self.scan.take() {
            handle.cancel();
        }
    }

    /// Whether a scan is running.
    pub fn is_scanning(&self) -> bool {
        self.scan.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// The running scan, for draining its events.
    pub fn scan_mut(&mut self) -> Option<&mut ScanHandle> {
        self.scan.as_mut()
    }

    /// Waits for the running scan to end and loads a detected payload.
    /// `None` when no scan was running.
    pub async fn finish_scan(&mut self) -> Option<ScanOutcome> {
        let outcome = self.scan.take()?.join().await;
        if let ScanOutcome::Detected(payload) = &outcome {
            self.apply(payload.clone());
        }
        Some(outcome)
    }

    /// Copies the current code.
    pub fn copy_code(&self) -> Result<(), SessionError> {
        let payload = self.payload.as_ref().ok_or(SessionError::NothingParsed)?;
        if payload.otp().is_none() {
            return Err(SessionError::NotOtp);
        }
        let code = self.code().code.ok_or(SessionError::NoCode)?;
        self.copy(&code)
    }

    /// Copies the base32 secret of the current OTP payload.
    pub fn copy_secret(&self) -> Result<(), SessionError> {
        let payload = self.payload.as_ref().ok_or(SessionError::NothingParsed)?;
        let params = payload.otp().ok_or(SessionError::NotOtp)?;
        self.copy(&params.secret_b32)
    }

    /// Copies the scanned text: the original URI for OTP payloads, the
    /// raw text otherwise.
    pub fn copy_uri(&self) -> Result<(), SessionError> {
        let payload = self.payload.as_ref().ok_or(SessionError::NothingParsed)?;
        let text = payload
            .otp()
            .map_or(payload.raw(), |params| params.original.as_str());
        self.copy(text)
    }

    fn copy(&self, text: &str) -> Result<(), SessionError> {
        let clipboard = self.clipboard.as_ref().ok_or(SessionError::NoClipboard)?;
        clipboard.write_text(text)?;
        tracing::debug!(bytes = text.len(), "Copied to clipboard");
        Ok(())
    }

    fn stop_refresh(&mut self) {
        if let Some(task) = self.refresh.take() {
            task.abort();
        }
        let (_, code) = watch::channel(CodeSnapshot::default());
        self.code = code;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = self.refresh.take() {
            task.abort();
        }
        self.cancel_scan();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("payload", &self.payload.as_ref().map(ParsedPayload::format))
            .field("refreshing", &self.refresh.is_some())
            .field("scanning", &self.scan.is_some())
            .finish()
    }
}
