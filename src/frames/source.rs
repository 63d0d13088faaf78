//! Frame sources: where raw frame bytes come from.
//!
//! A [`SourceProvider`] opens the byte stream for frame `i`. The stream holds
//! pre-converted pixel words, little-endian, one `0x00RRGGBB` word per pixel.
//! No decoding happens here.

use core::fmt::Write;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use heapless::String;

use crate::config::WORD_BYTES;
use crate::error::SourceError;

/// Blocking byte stream for one frame.
pub trait FrameSource {
    /// Read up to `buf.len()` bytes. Returns 0 at end of stream.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    #[inline]
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, SourceError> {
        (**self).read(buf)
    }
}

/// Opens the source of each frame by index.
pub trait SourceProvider {
    type Source: FrameSource;

    /// Open the byte stream for frame `index`.
    fn open(
        &mut self,
        index: usize,
    ) -> Result<Self::Source, SourceError>;
}

// =============================================================================
// Host File Naming
// =============================================================================

const FRAME_PATH_PREFIX: &str = "/mnt/host/gif/typing";
const FRAME_PATH_SUFFIX: &str = ".bin";

/// Capacity of a frame path (prefix, up to 20 digits, suffix).
pub const FRAME_PATH_CAPACITY: usize = 48;

/// Host path of one frame file.
pub type FramePath = String<FRAME_PATH_CAPACITY>;

/// Host path of frame `index`: `/mnt/host/gif/typing{index}.bin`.
pub fn frame_path(index: usize) -> FramePath {
    let mut path = FramePath::new();
    // Cannot overflow: prefix + suffix + usize::MAX digits < capacity
    let _ = write!(path, "{FRAME_PATH_PREFIX}{index}{FRAME_PATH_SUFFIX}");
    path
}

// =============================================================================
// Solid Colour Pattern
// =============================================================================

/// Packed pixel word for a colour: `0x00RRGGBB`.
pub fn pixel_word(color: Rgb888) -> u32 {
    (u32::from(color.r()) << 16) | (u32::from(color.g()) << 8) | u32::from(color.b())
}

/// Source yielding `pixels` words of one colour.
pub struct SolidColor {
    bytes: [u8; WORD_BYTES],
    position: usize,
    len: usize,
}

impl SolidColor {
    /// A frame of `pixels` words of `color`.
    pub fn new(
        color: Rgb888,
        pixels: usize,
    ) -> Self {
        Self {
            bytes: pixel_word(color).to_le_bytes(),
            position: 0,
            len: pixels * WORD_BYTES,
        }
    }
}

impl FrameSource for SolidColor {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, SourceError> {
        let n = buf.len().min(self.len - self.position);
        for (i, byte) in buf[..n].iter_mut().enumerate() {
            *byte = self.bytes[(self.position + i) % WORD_BYTES];
        }
        self.position += n;
        Ok(n)
    }
}

/// Provider cycling through a palette, one solid colour per frame.
pub struct SolidPattern<'a> {
    colors: &'a [Rgb888],
    pixels: usize,
}

impl<'a> SolidPattern<'a> {
    /// Frame `i` gets `colors[i % colors.len()]`.
    pub const fn new(
        colors: &'a [Rgb888],
        pixels: usize,
    ) -> Self {
        Self { colors, pixels }
    }
}

impl SourceProvider for SolidPattern<'_> {
    type Source = SolidColor;

    fn open(
        &mut self,
        index: usize,
    ) -> Result<SolidColor, SourceError> {
        if self.colors.is_empty() {
            return Err(SourceError::Open);
        }
        let color = self.colors[index % self.colors.len()];
        Ok(SolidColor::new(color, self.pixels))
    }
}

// =============================================================================
// Tests
// =============================================================================
