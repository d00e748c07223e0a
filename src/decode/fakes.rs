//! Test doubles for the decoder collaborators.

use super::{BarcodeDetector, DetectedBarcode, DetectorError, FallbackDecoder, FallbackOptions};
use crate::capture::Frame;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub(crate) struct FailingDetector;

impl BarcodeDetector for FailingDetector {
    fn detect(&self, _frame: &Frame) -> Result<Vec<DetectedBarcode>, DetectorError> {
        Err(DetectorError::Failed("simulated".into()))
    }
}

pub(crate) struct FixedDetector {
    values: Vec<String>,
}

impl FixedDetector {
    pub(crate) fn new(values: Vec<&str>) -> Self {
        Self {
            values: values.into_iter().map(str::to_string).collect(),
        }
    }
}

impl BarcodeDetector for FixedDetector {
    fn detect(&self, _frame: &Frame) -> Result<Vec<DetectedBarcode>, DetectorError> {
        Ok(self.values.iter().map(DetectedBarcode::new).collect())
    }
}

/// Returns the same value on every call and counts calls.
pub(crate) struct CountingFallback {
    value: Option<String>,
    calls: AtomicUsize,
    last_options: Mutex<Option<FallbackOptions>>,
}

impl CountingFallback {
    pub(crate) fn returning(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_options(&self) -> Option<FallbackOptions> {
        *self.last_options.lock().unwrap()
    }
}

impl FallbackDecoder for CountingFallback {
    fn decode(&self, _: &[u8], _: u32, _: u32, options: &FallbackOptions) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(*options);
        self.value.clone()
    }
}

/// Plays back a script of results, then keeps returning `then`.
/// Each call optionally sleeps to simulate a slow decoder.
pub(crate) struct ScriptedFallback {
    script: Mutex<VecDeque<Option<String>>>,
    then: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFallback {
    pub(crate) fn new(script: Vec<Option<&str>>, then: Option<&str>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().map(|v| v.map(str::to_string)).collect()),
            then: then.map(str::to_string),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping `decode` calls seen so far.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl FallbackDecoder for ScriptedFallback {
    fn decode(&self, _: &[u8], _: u32, _: u32, _: &FallbackOptions) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let next = self.script.lock().unwrap().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        next.unwrap_or_else(|| self.then.clone())
    }
}
