//! Frame type representing a captured RGBA image with metadata.

use std::time::Instant;

/// Bytes per pixel in a frame buffer (RGBA).
pub const BYTES_PER_PIXEL: usize = 4;

/// A single captured frame.
///
/// Pixels are row-major RGBA, the layout fallback decoders consume.
#[derive(Clone)]
pub struct Frame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    /// Capture instant, used to order attempts.
    timestamp: Instant,
    /// Monotonic sequence number assigned by the source.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame stamped with the current instant.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// An all-black frame of the given size.
    pub fn blank(width: u32, height: u32, sequence: u64) -> Self {
        let len = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        Self::new(vec![0; len], width, height, sequence)
    }

    /// Returns the raw RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns when the frame was captured.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the frame sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// True when the frame has non-zero dimensions and the buffer holds
    /// exactly `width * height` RGBA pixels.
    pub fn is_valid(&self) -> bool {
        self.pixel_count() > 0 && self.pixels.len() == self.pixel_count() * BYTES_PER_PIXEL
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}
