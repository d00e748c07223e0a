//! Prometheus counters for scanning and classification.
//!
//! Metrics are collected in-process and rendered on demand with
//! [`ScanMetrics::encode`]; nothing is served over the network.
//!
//! # Metrics Exposed
//!
//! - `qr_payload_scans_active` - Scan loops currently running
//! - `qr_payload_decode_attempts_total` - Decode invocations
//! - `qr_payload_frames_decoded_total` - Decodes that returned a value
//! - `qr_payload_duplicates_suppressed_total` - Values dropped by dedupe
//! - `qr_payload_payloads_classified_total{format}` - Classified payloads
//! - `qr_payload_payloads_rejected_total` - Classifier rejections
//!
//! # Example
//!
//! ```
//! use qr_payload::metrics::ScanMetrics;
//!
//! let metrics = ScanMetrics::new().expect("Failed to create registry");
//! metrics.decode_attempted();
//! assert!(metrics.encode().unwrap().contains("qr_payload_decode_attempts_total 1"));
//! ```

mod collector;

pub use collector::{MetricsError, ScanMetrics};
