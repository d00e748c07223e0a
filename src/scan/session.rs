//! Scan gating: throttle, in-flight guard and duplicate suppression.
//!
//! The session holds no clock; callers pass `Instant`s so the gating can
//! be driven deterministically.

use crate::config::ScanConfig;
use std::time::{Duration, Instant};

/// What happened to a decode result handed to [`ScanSession::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// New value; classify it.
    Accepted(String),
    /// Same value as the last accepted one, inside its dedupe window.
    Duplicate,
    /// Nothing decoded, or the session was cancelled while decoding.
    Discarded,
}

/// State of one scanning run.
#[derive(Debug, Clone)]
pub struct ScanSession {
    throttle: Duration,
    dedupe_window: Duration,
    active: bool,
    pending: bool,
    last_attempt: Option<Instant>,
    last_value: Option<(String, Instant)>,
}

impl ScanSession {
    /// Creates an inactive session.
    pub fn new(throttle: Duration, dedupe_window: Duration) -> Self {
        Self {
            throttle,
            dedupe_window,
            active: false,
            pending: false,
            last_attempt: None,
            last_value: None,
        }
    }

    /// Creates an inactive session using the configured timing.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.throttle(), config.dedupe_window())
    }

    /// Enters the scanning state with cleared gating state.
    pub fn start(&mut self) {
        self.reset();
        self.active = true;
    }

    /// Leaves the scanning state and forgets throttle, pending and dedupe state.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.active = false;
        self.pending = false;
        self.last_attempt = None;
        self.last_value = None;
    }

    /// Whether scanning is on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// A decode is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether a decode may start at `now`.
    pub fn can_attempt(&self, now: Instant) -> bool {
        self.active
            && !self.pending
            && self
                .last_attempt
                .map_or(true, |last| now.saturating_duration_since(last) >= self.throttle)
    }

    /// Marks a decode as started. Returns `false` (and changes nothing)
    /// when [`can_attempt`](Self::can_attempt) would.
    pub fn begin_attempt(&mut self, now: Instant) -> bool {
        if !self.can_attempt(now) {
            return false;
        }
        self.last_attempt = Some(now);
        self.pending = true;
        true
    }

    /// Records the end of the in-flight decode and decides what to do
    /// with its result.
    pub fn complete(&mut self, decoded: Option<String>, now: Instant) -> Admission {
        self.pending = false;

        let Some(value) = decoded.filter(|_| self.active) else {
            return Admission::Discarded;
        };

        if let Some((last, expires)) = &self.last_value {
            if *last == value && now < *expires {
                return Admission::Duplicate;
            }
        }

        self.last_value = Some((value.clone(), now + self.dedupe_window));
        Admission::Accepted(value)
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn started() -> (ScanSession, Instant) {
        let mut session = ScanSession::default();
        session.start();
        (session, Instant::now())
    }

    #[test]
    fn test_inactive_session_never_attempts() {
        let mut session = ScanSession::default();
        assert!(!session.begin_attempt(Instant::now()));
        assert!(!session.is_pending());
    }

    #[test]
    fn test_pending_guard() {
        let (mut session, t0) = started();
        assert!(session.begin_attempt(t0));
        assert!(session.is_pending());
        assert!(!session.begin_attempt(t0 + ms(1000)));

        session.complete(None, t0 + ms(1000));
        assert!(!session.is_pending());
        assert!(session.begin_attempt(t0 + ms(1000)));
    }

    #[test]
    fn test_throttle() {
        let (mut session, t0) = started();
        assert!(session.begin_attempt(t0));
        session.complete(None, t0 + ms(10));

        assert!(!session.begin_attempt(t0 + ms(259)));
        assert!(session.begin_attempt(t0 + ms(260)));
    }

    #[test]
    fn test_duplicate_within_window_is_suppressed() {
        let (mut session, t0) = started();

        session.begin_attempt(t0);
        let first = session.complete(Some("hello".into()), t0);
        assert_eq!(first, Admission::Accepted("hello".into()));

        session.begin_attempt(t0 + ms(300));
        let second = session.complete(Some("hello".into()), t0 + ms(300));
        assert_eq!(second, Admission::Duplicate);
    }

    #[test]
    fn test_same_value_after_window_is_accepted() {
        let (mut session, t0) = started();

        session.begin_attempt(t0);
        session.complete(Some("hello".into()), t0);

        let later = t0 + ms(2200);
        session.begin_attempt(later);
        assert_eq!(
            session.complete(Some("hello".into()), later),
            Admission::Accepted("hello".into())
        );
    }

    #[test]
    fn test_duplicate_does_not_extend_window() {
        let (mut session, t0) = started();

        session.begin_attempt(t0);
        session.complete(Some("a".into()), t0);
        session.begin_attempt(t0 + ms(2000));
        assert_eq!(session.complete(Some("a".into()), t0 + ms(2000)), Admission::Duplicate);

        session.begin_attempt(t0 + ms(2300));
        assert_eq!(
            session.complete(Some("a".into()), t0 + ms(2300)),
            Admission::Accepted("a".into())
        );
    }

    #[test]
    fn test_different_value_is_accepted_immediately() {
        let (mut session, t0) = started();

        session.begin_attempt(t0);
        session.complete(Some("a".into()), t0);
        session.begin_attempt(t0 + ms(300));
        assert_eq!(
            session.complete(Some("b".into()), t0 + ms(300)),
            Admission::Accepted("b".into())
        );
    }

    #[test]
    fn test_cancel_clears_everything() {
        let (mut session, t0) = started();
        session.begin_attempt(t0);
        session.complete(Some("a".into()), t0);
        session.begin_attempt(t0 + ms(300));

        session.cancel();
        assert!(!session.is_active());
        assert!(!session.is_pending());

        // In-flight result arriving after cancel is dropped.
        assert_eq!(session.complete(Some("b".into()), t0 + ms(310)), Admission::Discarded);

        // Restarting forgets the dedupe value and throttle.
        session.start();
        assert!(session.begin_attempt(t0 + ms(320)));
        assert_eq!(
            session.complete(Some("a".into()), t0 + ms(320)),
            Admission::Accepted("a".into())
        );
    }
}
