//! Frame decoding.
//!
//! A frame goes to the platform barcode detector when one is installed,
//! then to the pixel-buffer fallback decoder. Neither decoder lives in
//! this crate; both are collaborators behind traits.
//!
//! ```text
//! Frame ──▶ BarcodeDetector (optional) ──▶ raw value
//!              │ absent / error / empty
//!              ▼
//!           FallbackDecoder (once) ──▶ raw value | nothing
//! ```

mod collaborators;
mod orchestrator;

#[cfg(test)]
pub(crate) mod fakes;

pub use collaborators::{
    BarcodeDetector, DetectedBarcode, DetectorError, FallbackDecoder, FallbackOptions,
    InversionAttempts,
};
pub use orchestrator::{DecodeError, DecodeMode, DecodeOrchestrator};
