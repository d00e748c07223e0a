//! Periodic OTP code refresh.

use crate::otp::{generate_code, seconds_remaining, OtpParameters};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// The code on display and, for TOTP, the seconds until it rolls over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeSnapshot {
    /// `None` when nothing is parsed or the code could not be computed.
    pub code: Option<String>,
    /// Seconds until the TOTP code rolls over; `None` for HOTP.
    pub seconds_remaining: Option<u32>,
}

impl CodeSnapshot {
    /// Computes the snapshot for `params` at `now`.
    pub fn at(params: &OtpParameters, now: DateTime<Utc>) -> Self {
        let code = match generate_code(params, now) {
            Ok(code) => Some(code),
            Err(e) => {
                tracing::warn!(error = %e, label = %params.label, "Cannot compute code");
                None
            }
        };
        Self {
            code,
            seconds_remaining: params.period().map(|period| seconds_remaining(now, period)),
        }
    }
}

/// Publishes a fresh snapshot on every tick until aborted or until every
/// receiver is gone. The first tick fires immediately.
pub(crate) fn spawn_refresh(
    params: OtpParameters,
    tick: Duration,
    tx: watch::Sender<CodeSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(tick.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let snapshot = CodeSnapshot::at(&params, Utc::now());
            if tx.send(snapshot).is_err() {
                tracing::debug!("No code subscribers left, stopping refresh");
                break;
            }
        }
    })
}
