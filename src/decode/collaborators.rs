//! Decoder interfaces implemented outside this crate.

use crate::capture::Frame;
use thiserror::Error;

/// One barcode found by a detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedBarcode {
    /// Decoded text content.
    pub raw_value: String,
}

impl DetectedBarcode {
    /// Wraps a decoded value.
    pub fn new(raw_value: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
        }
    }
}

/// Errors reported by a barcode detector.
///
/// These never leave the orchestrator; a failing detector only means
/// the fallback decoder gets the frame.
#[derive(Debug, Clone, Error)]
pub enum DetectorError {
    /// No detector exists on this platform.
    #[error("barcode detector unavailable")]
    Unavailable,
    /// The frame format was refused.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    /// Detection itself failed.
    #[error("barcode detection failed: {0}")]
    Failed(String),
}

/// Platform barcode detection (restricted to QR codes).
pub trait BarcodeDetector: Send + Sync {
    /// Returns the codes found in the frame, best first.
    fn detect(&self, frame: &Frame) -> Result<Vec<DetectedBarcode>, DetectorError>;
}

/// Whether the fallback decoder also tries the colour-inverted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionAttempts {
    /// Normal image first, then inverted.
    #[default]
    AttemptBoth,
    /// Normal image only.
    DontInvert,
    /// Inverted image only.
    OnlyInvert,
    /// Inverted image first, then normal.
    InvertFirst,
}

/// Options handed to the fallback decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FallbackOptions {
    /// Which image polarities to try.
    pub inversion_attempts: InversionAttempts,
}

/// Pixel-buffer QR decoding.
pub trait FallbackDecoder: Send + Sync {
    /// Decodes row-major RGBA `pixels`. `None` when no code is found.
    fn decode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        options: &FallbackOptions,
    ) -> Option<String>;
}
