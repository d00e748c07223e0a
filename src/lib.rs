//! QR Payload Library
//!
//! Turns text recovered from QR codes into typed payloads and keeps
//! one-time-password codes fresh for `otpauth://` enrollment links.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → decode → scan (throttle, dedupe) → classify → session
//!                                                 ↓           ↓
//!                                              parsers    otp refresh
//! ```
//!
//! Pixel-level QR decoding, cameras and the clipboard are collaborators
//! behind traits ([`decode::BarcodeDetector`], [`decode::FallbackDecoder`],
//! [`capture::FrameSource`], [`session::ClipboardSink`]).
//!
//! # Design Principles
//!
//! - **Unrecognised is not an error**: unknown text becomes a plain-text payload
//! - **Strict OTP validation**: a malformed `otpauth://` link is reported, not guessed at
//! - **Pure code generation**: codes depend only on parameters and the supplied time
//! - **Explicit ownership**: the caller's [`Session`] owns the payload and its tasks
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use qr_payload::{classify, generate_code, PayloadFormat};
//!
//! let payload = classify("otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXP").unwrap();
//! assert_eq!(payload.format(), PayloadFormat::Otp);
//!
//! let params = payload.otp().unwrap();
//! let code = generate_code(params, Utc.timestamp_opt(59, 0).unwrap()).unwrap();
//! assert_eq!(code, "996554");
//!
//! let wifi = classify(r"WIFI:S:My\;Net;T:WPA;P:pass\\word;;").unwrap();
//! assert_eq!(wifi.format(), PayloadFormat::Wifi);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod metrics;
pub mod otp;
pub mod parsers;
pub mod payload;
pub mod scan;
pub mod session;

// Re-export commonly used types at crate root
pub use capture::{CaptureError, Frame, FrameSource};
pub use classify::{classify, classify_with};
pub use config::FileConfig;
pub use decode::{DecodeError, DecodeMode, DecodeOrchestrator};
pub use error::{OtpValidationError, ParseError};
pub use otp::{generate_code, OtpParameters, OtpPolicy};
pub use payload::{ParsedPayload, PayloadData, PayloadFormat};
pub use scan::{ScanHandle, ScanLoop, ScanOutcome};
pub use session::{CodeSnapshot, Session};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
