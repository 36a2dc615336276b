//! Frame buffer abstraction over the camera driver's acquire/return protocol.

use serde::Serialize;
use std::fmt;

/// Pixel format reported by the camera for a captured buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelFormat {
    Grayscale,
    Jpeg,
    Rgb565,
    Yuv422,
    Rgb888,
    Other(u32),
}

impl PixelFormat {
    /// Grayscale is one channel, everything else is treated as color
    pub fn channels(self) -> u8 {
        match self {
            PixelFormat::Grayscale => 1,
            _ => 3,
        }
    }
}

/// A captured image buffer. Owned by whoever holds it until handed back to
/// its [`FrameSource`].
pub trait Frame {
    fn data(&self) -> &[u8];
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn format(&self) -> PixelFormat;

    fn len(&self) -> usize {
        self.data().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn info(&self) -> FrameInfo {
        FrameInfo {
            len: self.len(),
            width: self.width(),
            height: self.height(),
            format: self.format(),
        }
    }
}

/// Camera buffer pool.
///
/// Every frame returned by `acquire` must be passed to `release` exactly
/// once before the next `acquire`; the pool is small (two buffers on the
/// ESP32-CAM) and a leaked frame stalls capture. `release` takes the frame by
/// value so the same frame cannot be returned twice.
pub trait FrameSource {
    type Frame: Frame;

    /// Blocks while the peripheral fills a buffer. `None` on hardware failure.
    fn acquire(&mut self) -> Option<Self::Frame>;

    fn release(&mut self, frame: Self::Frame);
}

/// Metadata copied out of a frame, safe to keep after release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    pub len: usize,
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
}

impl FrameInfo {
    pub fn channels(&self) -> u8 {
        self.format.channels()
    }

    /// `[width, height, channels]`
    pub fn shape(&self) -> FrameShape {
        FrameShape(*self)
    }
}

pub struct FrameShape(FrameInfo);

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0.width, self.0.height, self.0.channels())
    }
}
