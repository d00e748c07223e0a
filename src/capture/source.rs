//! Frame sources.
//!
//! The scan loop pulls frames on demand from a [`FrameSource`]. Real
//! sources (camera streams, decoded still images) live outside this
//! crate; [`MockSource`] scripts warm-up and failure for tests.

use super::Frame;
use thiserror::Error;

/// Errors that can occur while pulling a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The source has no frame dimensions yet (stream still warming up).
    /// The scan loop skips the cycle and tries again.
    #[error("capture source not ready")]
    NotReady,
    /// The source has stopped producing frames.
    #[error("capture source closed")]
    Closed,
    /// Any other capture failure.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
}

impl CaptureError {
    /// Whether the scan loop should simply retry on the next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(self, CaptureError::NotReady)
    }
}

/// A source of frames, pulled once per scan attempt.
pub trait FrameSource: Send {
    /// Captures the current frame.
    fn capture(&mut self) -> Result<Frame, CaptureError>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> Result<Frame, CaptureError> + Send,
{
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        self()
    }
}

/// Scripted source producing blank RGBA frames.
#[derive(Debug)]
pub struct MockSource {
    width: u32,
    height: u32,
    sequence: u64,
    warmup: u32,
    fail_after: Option<u64>,
}

impl MockSource {
    /// Creates a source producing `width` x `height` frames.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sequence: 0,
            warmup: 0,
            fail_after: None,
        }
    }

    /// Reports `NotReady` for the first `calls` captures.
    pub fn with_warmup(mut self, calls: u32) -> Self {
        self.warmup = calls;
        self
    }

    /// Reports `Closed` once `frames` frames have been produced.
    pub fn fail_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Frames produced so far.
    pub fn produced(&self) -> u64 {
        self.sequence
    }
}

impl FrameSource for MockSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        if self.warmup > 0 {
            self.warmup -= 1;
            return Err(CaptureError::NotReady);
        }
        if self.fail_after.is_some_and(|limit| self.sequence >= limit) {
            return Err(CaptureError::Closed);
        }

        self.sequence += 1;
        Ok(Frame::blank(self.width, self.height, self.sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_sequence() {
        let mut source = MockSource::new(4, 4);

        let frame = source.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        let frame2 = source.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);
        assert_eq!(source.produced(), 2);
    }

    #[test]
    fn test_warmup_then_frames() {
        let mut source = MockSource::new(4, 4).with_warmup(2);

        assert_eq!(source.capture().unwrap_err(), CaptureError::NotReady);
        assert_eq!(source.capture().unwrap_err(), CaptureError::NotReady);
        assert!(source.capture().is_ok());
    }

    #[test]
    fn test_fail_after() {
        let mut source = MockSource::new(4, 4).fail_after(1);

        assert!(source.capture().is_ok());
        let err = source.capture().unwrap_err();
        assert_eq!(err, CaptureError::Closed);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_closure_source() {
        let mut calls = 0;
        let mut source = move || {
            calls += 1;
            Ok::<_, CaptureError>(Frame::blank(2, 2, calls))
        };
        assert_eq!(FrameSource::capture(&mut source).unwrap().sequence(), 1);
    }
}
