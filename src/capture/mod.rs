//! Frame capture.
//!
//! Frames are pulled from an external source once per scan attempt.
//! The source owns the device or image; this module only defines the
//! frame layout and the pull interface.

mod frame;
mod source;

pub use frame::{Frame, BYTES_PER_PIXEL};
pub use source::{CaptureError, FrameSource, MockSource};
