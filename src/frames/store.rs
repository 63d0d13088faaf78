//! Frame store: N equal frames laid out back to back in one word region.
//!
//! # Layout
//!
//! ```text
//! base                base + span          base + (N-1) * span
//! │ frame 0 (pixels)  │ frame 1 (pixels)   │ ... frame N-1 │
//! ```
//!
//! Frames never overlap and leave no gaps. The store is filled once, in
//! index order, then sealed into read-only [`LoadedFrames`]; playback can only
//! be built from the sealed form.
//!
//! # Cache Coherency
//!
//! Every loaded frame is flushed from the data cache before the next one is
//! touched, including frames whose read came up short. The DMA engine reads
//! DRAM directly and would otherwise see stale lines.

use crate::cache::DataCache;
use crate::config::WORD_BYTES;
use crate::error::{ConfigError, LoadError, SourceError};
use crate::frames::source::{FrameSource, SourceProvider};

/// View of one frame: where it starts and how large it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    index: usize,
    base: u32,
    pixels: usize,
}

impl Frame {
    /// Position in the store.
    #[inline]
    pub const fn index(&self) -> usize { self.index }

    /// Bus address of the first pixel word.
    #[inline]
    pub const fn base(&self) -> u32 { self.base }

    /// Pixel words in the frame.
    #[inline]
    pub const fn pixels(&self) -> usize { self.pixels }

    /// Bytes spanned by the frame.
    #[inline]
    pub const fn byte_span(&self) -> usize { self.pixels * WORD_BYTES }
}

/// Frame store being populated.
pub struct FrameStore<'m> {
    memory: &'m mut [u32],
    base: u32,
    frame_count: usize,
    frame_pixels: usize,
    loaded: usize,
}

impl<'m> FrameStore<'m> {
    /// Lay out `frame_count` frames of `frame_pixels` words over `memory`.
    ///
    /// `base` is the bus address the DMA engine uses for `memory[0]`. The
    /// region must hold exactly `frame_count * frame_pixels` words and must not
    /// run past the 32-bit bus space.
    pub fn new(
        memory: &'m mut [u32],
        base: u32,
        frame_count: usize,
        frame_pixels: usize,
    ) -> Result<Self, ConfigError> {
        if frame_count == 0 || frame_pixels == 0 {
            return Err(ConfigError::EmptyStore);
        }

        let expected = frame_count.checked_mul(frame_pixels).ok_or(ConfigError::AddressOverflow)?;
        if memory.len() != expected {
            return Err(ConfigError::MemorySize {
                expected,
                actual: memory.len(),
            });
        }

        let bytes = (expected as u64) * WORD_BYTES as u64;
        if u64::from(base) + bytes > 1 << 32 {
            return Err(ConfigError::AddressOverflow);
        }

        Ok(Self {
            memory,
            base,
            frame_count,
            frame_pixels,
            loaded: 0,
        })
    }

    /// Frames the store holds when complete.
    #[inline]
    pub const fn frame_count(&self) -> usize { self.frame_count }

    /// Frames loaded so far.
    #[inline]
    pub const fn loaded(&self) -> usize { self.loaded }

    /// Whether every frame has been loaded.
    #[inline]
    pub const fn is_complete(&self) -> bool { self.loaded == self.frame_count }

    /// View of frame `index`, loaded or not.
    pub fn frame(
        &self,
        index: usize,
    ) -> Option<Frame> {
        (index < self.frame_count).then(|| frame_at(self.base, self.frame_pixels, index))
    }

    /// Load the next frame from `source` and flush it from the data cache.
    ///
    /// `index` must be the next frame in order. Reads until the frame is full
    /// or the source ends. Returns the number of whole words read, which is
    /// always the frame's pixel count on success.
    pub fn load_frame<S, C>(
        &mut self,
        index: usize,
        source: &mut S,
        cache: &mut C,
    ) -> Result<usize, LoadError>
    where
        S: FrameSource + ?Sized,
        C: DataCache + ?Sized,
    {
        if index >= self.frame_count {
            return Err(LoadError::IndexOutOfRange {
                index,
                count: self.frame_count,
            });
        }
        if index != self.loaded {
            return Err(LoadError::OutOfOrder {
                index,
                expected: self.loaded,
            });
        }

        let pixels = self.frame_pixels;
        let start = index * pixels;
        let words = &mut self.memory[start..start + pixels];

        let result = read_words(source, words);
        cache.flush(words);

        let read = result.map_err(|_| LoadError::Read { index })?;
        if read < pixels {
            return Err(LoadError::ShortRead {
                index,
                expected: pixels,
                actual: read,
            });
        }

        self.loaded += 1;
        Ok(read)
    }

    /// Load every frame from `provider` in order, then seal the store.
    pub fn load_all<P, C>(
        mut self,
        provider: &mut P,
        cache: &mut C,
    ) -> Result<LoadedFrames<'m>, LoadError>
    where
        P: SourceProvider + ?Sized,
        C: DataCache + ?Sized,
    {
        for index in self.loaded..self.frame_count {
            let mut source = provider.open(index).map_err(|_| LoadError::Open { index })?;
            let words = self.load_frame(index, &mut source, cache)?;
            crate::log_info!("Frame {} staged: {} words", index, words);
        }
        self.seal()
    }

    /// Freeze a fully loaded store.
    pub fn seal(self) -> Result<LoadedFrames<'m>, LoadError> {
        if !self.is_complete() {
            return Err(LoadError::Incomplete {
                loaded: self.loaded,
                count: self.frame_count,
            });
        }
        Ok(LoadedFrames {
            memory: self.memory,
            base: self.base,
            frame_count: self.frame_count,
            frame_pixels: self.frame_pixels,
        })
    }
}

/// Read-only, fully populated frame store.
#[derive(Clone, Copy)]
pub struct LoadedFrames<'m> {
    memory: &'m [u32],
    base: u32,
    frame_count: usize,
    frame_pixels: usize,
}

impl<'m> LoadedFrames<'m> {
    /// Number of frames (N, at least 1).
    #[inline]
    pub const fn frame_count(&self) -> usize { self.frame_count }

    /// Pixel words per frame.
    #[inline]
    pub const fn frame_pixels(&self) -> usize { self.frame_pixels }

    /// Bus address of frame 0.
    #[inline]
    pub const fn base(&self) -> u32 { self.base }

    /// View of frame `index`.
    pub fn frame(
        &self,
        index: usize,
    ) -> Option<Frame> {
        (index < self.frame_count).then(|| frame_at(self.base, self.frame_pixels, index))
    }

    /// View of frame `index mod N`.
    #[inline]
    pub fn frame_wrapping(
        &self,
        index: usize,
    ) -> Frame {
        frame_at(self.base, self.frame_pixels, index % self.frame_count)
    }

    /// First frame.
    #[inline]
    pub fn first(&self) -> Frame { frame_at(self.base, self.frame_pixels, 0) }

    /// Pixel words of frame `index`.
    pub fn words(
        &self,
        index: usize,
    ) -> Option<&'m [u32]> {
        if index >= self.frame_count {
            return None;
        }
        let start = index * self.frame_pixels;
        Some(&self.memory[start..start + self.frame_pixels])
    }
}

#[inline]
fn frame_at(
    base: u32,
    pixels: usize,
    index: usize,
) -> Frame {
    // Bounded by the address check in FrameStore::new
    let offset = (index * pixels * WORD_BYTES) as u32;
    Frame {
        index,
        base: base + offset,
        pixels,
    }
}

/// Fill `words` from `source` and decode them as little-endian.
///
/// Returns the number of whole words received before the source ended.
fn read_words<S: FrameSource + ?Sized>(
    source: &mut S,
    words: &mut [u32],
) -> Result<usize, SourceError> {
    let len = words.len() * WORD_BYTES;
    // SAFETY: u8 has no alignment requirement and every bit pattern is a valid
    // u32, so the frame's words can be filled through a byte view of the same
    // region. The view ends before `words` is used again.
    let bytes = unsafe { core::slice::from_raw_parts_mut(words.as_mut_ptr().cast::<u8>(), len) };

    let mut filled = 0;
    while filled < len {
        let n = source.read(&mut bytes[filled..])?;
        if n == 0 {
            break;
        }
        filled += n.min(len - filled);
    }

    let whole = filled / WORD_BYTES;
    for word in &mut words[..whole] {
        *word = u32::from_le(*word);
    }
    Ok(whole)
}

// =============================================================================
// Tests
// =============================================================================
