//! Continuous camera scanning.
//!
//! States: Idle → Scanning → (detected | cancelled | failed) → Idle.
//!
//! [`ScanSession`] decides when a decode may run and whether its result
//! is new; [`ScanLoop`] drives it on a tokio task.

mod runner;
mod session;

pub use runner::{ScanError, ScanEvent, ScanHandle, ScanLoop, ScanOutcome};
pub use session::{Admission, ScanSession};
