//! Metrics collection and registry.

use crate::payload::PayloadFormat;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Prometheus counters for scanning and classification.
///
/// Cloning is cheap and clones share the same underlying metrics.
#[derive(Clone)]
pub struct ScanMetrics {
    registry: Registry,

    // Scan loop
    scans_active: IntGauge,
    decode_attempts: IntCounter,
    frames_decoded: IntCounter,
    duplicates_suppressed: IntCounter,

    // Classification
    payloads_classified: IntCounterVec,
    payloads_rejected: IntCounter,
}

impl ScanMetrics {
    /// Creates a registry with all metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let scans_active = IntGauge::new("qr_payload_scans_active", "Scan loops currently running")?;
        let decode_attempts = IntCounter::new(
            "qr_payload_decode_attempts_total",
            "Decode invocations that passed the throttle and pending guard",
        )?;
        let frames_decoded = IntCounter::new(
            "qr_payload_frames_decoded_total",
            "Decode invocations that returned a value",
        )?;
        let duplicates_suppressed = IntCounter::new(
            "qr_payload_duplicates_suppressed_total",
            "Decoded values dropped inside the dedupe window",
        )?;
        let payloads_classified = IntCounterVec::new(
            Opts::new(
                "qr_payload_payloads_classified_total",
                "Payloads classified, by format",
            ),
            &["format"],
        )?;
        let payloads_rejected = IntCounter::new(
            "qr_payload_payloads_rejected_total",
            "Decoded values the classifier rejected",
        )?;

        registry.register(Box::new(scans_active.clone()))?;
        registry.register(Box::new(decode_attempts.clone()))?;
        registry.register(Box::new(frames_decoded.clone()))?;
        registry.register(Box::new(duplicates_suppressed.clone()))?;
        registry.register(Box::new(payloads_classified.clone()))?;
        registry.register(Box::new(payloads_rejected.clone()))?;

        Ok(Self {
            registry,
            scans_active,
            decode_attempts,
            frames_decoded,
            duplicates_suppressed,
            payloads_classified,
            payloads_rejected,
        })
    }

    /// Marks a scan as running.
    pub fn scan_started(&self) {
        self.scans_active.inc();
    }

    /// Marks a scan as ended.
    pub fn scan_stopped(&self) {
        self.scans_active.dec();
    }

    /// Counts one decode invocation.
    pub fn decode_attempted(&self) {
        self.decode_attempts.inc();
    }

    /// Counts one frame that yielded a value.
    pub fn frame_decoded(&self) {
        self.frames_decoded.inc();
    }

    /// Counts one value ignored inside the dedupe window.
    pub fn duplicate_suppressed(&self) {
        self.duplicates_suppressed.inc();
    }

    /// Counts one classified payload by format.
    pub fn payload_classified(&self, format: PayloadFormat) {
        let label = format!("{format:?}").to_lowercase();
        self.payloads_classified.with_label_values(&[&label]).inc();
    }

    /// Counts one value that failed classification.
    pub fn payload_rejected(&self) {
        self.payloads_rejected.inc();
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl std::fmt::Debug for ScanMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanMetrics")
            .field("decode_attempts", &self.decode_attempts.get())
            .field("frames_decoded", &self.frames_decoded.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        assert!(ScanMetrics::new().is_ok());
    }

    #[test]
    fn test_counters() {
        let metrics = ScanMetrics::new().unwrap();

        metrics.scan_started();
        metrics.decode_attempted();
        metrics.decode_attempted();
        metrics.frame_decoded();
        metrics.duplicate_suppressed();
        metrics.payload_classified(PayloadFormat::Wifi);
        metrics.payload_rejected();

        let output = metrics.encode().unwrap();
        assert!(output.contains("qr_payload_scans_active 1"));
        assert!(output.contains("qr_payload_decode_attempts_total 2"));
        assert!(output.contains("qr_payload_frames_decoded_total 1"));
        assert!(output.contains("qr_payload_duplicates_suppressed_total 1"));
        assert!(output.contains("qr_payload_payloads_classified_total{format=\"wifi\"} 1"));
        assert!(output.contains("qr_payload_payloads_rejected_total 1"));
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = ScanMetrics::new().unwrap();
        let clone = metrics.clone();
        clone.decode_attempted();
        assert!(metrics.encode().unwrap().contains("qr_payload_decode_attempts_total 1"));
    }
}
