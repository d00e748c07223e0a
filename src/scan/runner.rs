//! Continuous scan loop on tokio.
//!
//! One task per scan. Each tick (one display refresh) checks the gating
//! in [`ScanSession`], pulls a frame and hands it to a blocking decode.
//! At most one decode is in flight. Cancellation stops scheduling at once;
//! an in-flight decode runs to completion and its result is dropped.

use super::session::{Admission, ScanSession};
use crate::capture::{CaptureError, FrameSource};
use crate::classify::classify_with;
use crate::config::ScanConfig;
use crate::decode::{DecodeError, DecodeMode, DecodeOrchestrator};
use crate::error::ParseError;
use crate::metrics::ScanMetrics;
use crate::otp::OtpPolicy;
use crate::payload::ParsedPayload;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;

type DecodeTask = JoinHandle<Result<Option<String>, DecodeError>>;

/// Errors that end a scan without a payload.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The frame source failed for good.
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// The scan task panicked or was aborted.
    #[error("scan task failed: {0}")]
    Task(String),
}

/// How a scan ended.
#[derive(Debug)]
pub enum ScanOutcome {
    /// A decoded value classified successfully; the scan stopped.
    Detected(ParsedPayload),
    /// Cancelled through the handle.
    Cancelled,
    /// Ended by an error.
    Failed(ScanError),
}

/// Reported while the scan keeps running.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// A decoded value the classifier refused. Scanning continues so the
    /// user can reposition the code.
    Rejected {
        /// The decoded text.
        value: String,
        /// Why classification failed.
        error: ParseError,
    },
}

/// Configures and starts scan loops.
#[derive(Debug, Clone)]
pub struct ScanLoop {
    orchestrator: Arc<DecodeOrchestrator>,
    config: ScanConfig,
    policy: OtpPolicy,
    metrics: Option<ScanMetrics>,
}

impl ScanLoop {
    /// Creates a loop with default timing and OTP policy.
    pub fn new(orchestrator: DecodeOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            config: ScanConfig::default(),
            policy: OtpPolicy::default(),
            metrics: None,
        }
    }

    /// Overrides scan timing.
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Policy applied to scanned `otpauth://` links.
    pub fn with_policy(mut self, policy: OtpPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Records scan activity into `metrics`.
    pub fn with_metrics(mut self, metrics: ScanMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Starts scanning frames from `source`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S>(&self, source: S) -> ScanHandle
    where
        S: FrameSource + 'static,
    {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let worker = Worker {
            orchestrator: Arc::clone(&self.orchestrator),
            session: ScanSession::from_config(&self.config),
            frame_interval: self.config.frame_interval().max(Duration::from_millis(1)),
            policy: self.policy.clone(),
            metrics: self.metrics.clone(),
            events: events_tx,
        };
        let task = tokio::spawn(worker.run(source, cancel_rx));

        ScanHandle {
            cancel: cancel_tx,
            task,
            events: events_rx,
        }
    }
}

/// A running scan. Dropping the handle cancels the scan.
#[derive(Debug)]
pub struct ScanHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<ScanOutcome>,
    events: mpsc::UnboundedReceiver<ScanEvent>,
}

impl ScanHandle {
    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Whether the scan task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Next event, if one is queued.
    pub fn try_next_event(&mut self) -> Option<ScanEvent> {
        self.events.try_recv().ok()
    }

    /// Waits for the next event. `None` once the scan has ended and all
    /// events were drained.
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        self.events.recv().await
    }

    /// Waits for the scan to end.
    pub async fn join(self) -> ScanOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => ScanOutcome::Failed(ScanError::Task(e.to_string())),
        }
    }
}

struct Worker {
    orchestrator: Arc<DecodeOrchestrator>,
    session: ScanSession,
    frame_interval: Duration,
    policy: OtpPolicy,
    metrics: Option<ScanMetrics>,
    events: mpsc::UnboundedSender<ScanEvent>,
}

impl Worker {
    async fn run<S: FrameSource>(mut self, mut source: S, mut cancel: watch::Receiver<bool>) -> ScanOutcome {
        self.session.start();
        if let Some(m) = &self.metrics {
            m.scan_started();
        }
        tracing::debug!(interval = ?self.frame_interval, "Scan started");

        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<DecodeTask> = None;

        let outcome = loop {
            tokio::select! {
                biased;

                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break ScanOutcome::Cancelled;
                    }
                }

                joined = wait_decode(&mut in_flight) => {
                    in_flight = None;
                    if let Some(payload) = self.handle_decoded(joined) {
                        break ScanOutcome::Detected(payload);
                    }
                }

                _ = ticker.tick() => {
                    let now = Instant::now();
                    if !self.session.can_attempt(now) {
                        continue;
                    }
                    match source.capture() {
                        Ok(frame) => {
                            self.session.begin_attempt(now);
                            if let Some(m) = &self.metrics {
                                m.decode_attempted();
                            }
                            let orchestrator = Arc::clone(&self.orchestrator);
                            in_flight = Some(tokio::task::spawn_blocking(move || {
                                orchestrator.decode_frame(&frame, DecodeMode::Scanning)
                            }));
                        }
                        Err(e) if e.is_transient() => {
                            tracing::trace!("Capture source not ready, skipping frame");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Capture failed, stopping scan");
                            break ScanOutcome::Failed(ScanError::Capture(e));
                        }
                    }
                }
            }
        };

        // Any in-flight decode is detached; its result is never read.
        self.session.cancel();
        if let Some(m) = &self.metrics {
            m.scan_stopped();
        }
        tracing::debug!(outcome = outcome_name(&outcome), "Scan ended");
        outcome
    }

    fn handle_decoded(
        &mut self,
        joined: Result<Result<Option<String>, DecodeError>, JoinError>,
    ) -> Option<ParsedPayload> {
        let decoded = match joined {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Decode failed, retrying on next frame");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Decode task failed");
                None
            }
        };

        if decoded.is_some() {
            if let Some(m) = &self.metrics {
                m.frame_decoded();
            }
        }

        match self.session.complete(decoded, Instant::now()) {
            Admission::Discarded => None,
            Admission::Duplicate => {
                tracing::trace!("Duplicate value inside dedupe window");
                if let Some(m) = &self.metrics {
                    m.duplicate_suppressed();
                }
                None
            }
            Admission::Accepted(value) => match classify_with(&value, &self.policy) {
                Ok(payload) => {
                    if let Some(m) = &self.metrics {
                        m.payload_classified(payload.format());
                    }
                    Some(payload)
                }
                Err(error) => {
                    tracing::info!(error = %error, "Scanned code rejected");
                    if let Some(m) = &self.metrics {
                        m.payload_rejected();
                    }
                    // The receiver may be gone; the scan carries on regardless.
                    let _ = self.events.send(ScanEvent::Rejected { value, error });
                    None
                }
            },
        }
    }
}

/// Resolves when the in-flight decode finishes; never resolves when idle.
async fn wait_decode(
    task: &mut Option<DecodeTask>,
) -> Result<Result<Option<String>, DecodeError>, JoinError> {
    match task {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn outcome_name(outcome: &ScanOutcome) -> &'static str {
    match outcome {
        ScanOutcome::Detected(_) => "detected",
        ScanOutcome::Cancelled => "cancelled",
        ScanOutcome::Failed(_) => "failed",
    }
}
