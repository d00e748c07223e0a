//! Detector-then-fallback decoding of a single frame.

use super::{BarcodeDetector, FallbackDecoder, FallbackOptions};
use crate::capture::Frame;
use std::sync::Arc;
use thiserror::Error;

/// How "no code in this frame" is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// One-shot decode (still image, single capture): nothing found is an error.
    Strict,
    /// Continuous scanning: nothing found is `Ok(None)` and the caller retries.
    Scanning,
}

/// Strict-mode decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Neither decoder found a code.
    #[error("no QR code found")]
    NoCodeFound,
    /// The pixel buffer does not match the frame dimensions.
    #[error("invalid frame: {width}x{height} with {bytes} bytes is not RGBA")]
    InvalidFrame {
        /// Frame width.
        width: u32,
        /// Frame height.
        height: u32,
        /// Actual buffer length.
        bytes: usize,
    },
}

/// Runs the optional detector, then the fallback decoder.
#[derive(Clone)]
pub struct DecodeOrchestrator {
    detector: Option<Arc<dyn BarcodeDetector>>,
    fallback: Arc<dyn FallbackDecoder>,
    options: FallbackOptions,
}

impl DecodeOrchestrator {
    /// Creates an orchestrator with only the fallback decoder.
    pub fn new(fallback: Arc<dyn FallbackDecoder>) -> Self {
        Self {
            detector: None,
            fallback,
            options: FallbackOptions::default(),
        }
    }

    /// Installs a primary barcode detector.
    pub fn with_detector(mut self, detector: Arc<dyn BarcodeDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Replaces the fallback decoder options.
    pub fn with_options(mut self, options: FallbackOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether a primary detector is installed.
    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    /// Decodes one frame.
    ///
    /// Detector errors are logged and never returned. The fallback runs at
    /// most once per call.
    pub fn decode_frame(&self, frame: &Frame, mode: DecodeMode) -> Result<Option<String>, DecodeError> {
        if !frame.is_valid() {
            tracing::debug!(?frame, "Rejecting malformed frame");
            return match mode {
                DecodeMode::Strict => Err(DecodeError::InvalidFrame {
                    width: frame.width(),
                    height: frame.height(),
                    bytes: frame.pixels().len(),
                }),
                DecodeMode::Scanning => Ok(None),
            };
        }

        if let Some(value) = self.detect(frame) {
            return Ok(Some(value));
        }

        let decoded = self
            .fallback
            .decode(frame.pixels(), frame.width(), frame.height(), &self.options)
            .filter(|value| !value.is_empty());

        match (decoded, mode) {
            (Some(value), _) => {
                tracing::debug!(sequence = frame.sequence(), "Fallback decoder found a code");
                Ok(Some(value))
            }
            (None, DecodeMode::Strict) => Err(DecodeError::NoCodeFound),
            (None, DecodeMode::Scanning) => Ok(None),
        }
    }

    fn detect(&self, frame: &Frame) -> Option<String> {
        let detector = self.detector.as_ref()?;
        match detector.detect(frame) {
            Ok(codes) => codes
                .into_iter()
                .next()
                .map(|code| code.raw_value)
                .filter(|value| !value.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Barcode detector failed, falling back");
                None
            }
        }
    }
}

impl std::fmt::Debug for DecodeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeOrchestrator")
            .field("has_detector", &self.detector.is_some())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fakes::{CountingFallback, FailingDetector, FixedDetector};
    use crate::decode::InversionAttempts;

    fn frame() -> Frame {
        Frame::blank(8, 8, 1)
    }

    #[test]
    fn test_detector_result_wins() {
        let fallback = Arc::new(CountingFallback::returning(Some("fallback")));
        let orchestrator = DecodeOrchestrator::new(fallback.clone())
            .with_detector(Arc::new(FixedDetector::new(vec!["primary", "second"])));

        let value = orchestrator.decode_frame(&frame(), DecodeMode::Strict).unwrap();
        assert_eq!(value.as_deref(), Some("primary"));
        assert_eq!(fallback.calls(), 0);
    }

    #[test]
    fn test_failing_detector_falls_back_once() {
        let fallback = Arc::new(CountingFallback::returning(None));
        let orchestrator =
            DecodeOrchestrator::new(fallback.clone()).with_detector(Arc::new(FailingDetector));

        let scanning = orchestrator.decode_frame(&frame(), DecodeMode::Scanning);
        assert_eq!(scanning, Ok(None));
        assert_eq!(fallback.calls(), 1);

        let strict = orchestrator.decode_frame(&frame(), DecodeMode::Strict);
        assert_eq!(strict, Err(DecodeError::NoCodeFound));
        assert_eq!(fallback.calls(), 2);
    }

    #[test]
    fn test_empty_detector_result_falls_back() {
        let fallback = Arc::new(CountingFallback::returning(Some("from-fallback")));
        let orchestrator = DecodeOrchestrator::new(fallback.clone())
            .with_detector(Arc::new(FixedDetector::new(vec![""])));

        let value = orchestrator.decode_frame(&frame(), DecodeMode::Scanning).unwrap();
        assert_eq!(value.as_deref(), Some("from-fallback"));
        assert_eq!(fallback.calls(), 1);
    }

    #[test]
    fn test_no_detector_uses_fallback_with_both_inversions() {
        let fallback = Arc::new(CountingFallback::returning(Some("x")));
        let orchestrator = DecodeOrchestrator::new(fallback.clone());

        assert!(!orchestrator.has_detector());
        orchestrator.decode_frame(&frame(), DecodeMode::Strict).unwrap();
        assert_eq!(
            fallback.last_options().map(|o| o.inversion_attempts),
            Some(InversionAttempts::AttemptBoth)
        );
    }

    #[test]
    fn test_empty_fallback_value_is_nothing() {
        let orchestrator = DecodeOrchestrator::new(Arc::new(CountingFallback::returning(Some(""))));
        assert_eq!(
            orchestrator.decode_frame(&frame(), DecodeMode::Strict),
            Err(DecodeError::NoCodeFound)
        );
    }

    #[test]
    fn test_invalid_frame() {
        let fallback = Arc::new(CountingFallback::returning(Some("x")));
        let orchestrator = DecodeOrchestrator::new(fallback.clone());
        let bad = Frame::new(vec![0; 10], 8, 8, 1);

        assert!(matches!(
            orchestrator.decode_frame(&bad, DecodeMode::Strict),
            Err(DecodeError::InvalidFrame { bytes: 10, .. })
        ));
        assert_eq!(orchestrator.decode_frame(&bad, DecodeMode::Scanning), Ok(None));
        assert_eq!(fallback.calls(), 0);
    }
}
