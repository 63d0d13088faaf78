//! Host-side fakes for the hardware seams.
//!
//! Every fake records into a shared [`Trace`] so a test can assert the exact
//! interleaving of register writes, delays and cache flushes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::cache::DataCache;
use crate::clock::Clock;
use crate::config::WORD_BYTES;
use crate::drivers::offset::DMA_CONTROL;
use crate::error::SourceError;
use crate::frames::{FrameSource, SourceProvider};
use crate::regs::RegisterBlock;

/// One observable side effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Write { offset: usize, value: u32 },
    Delay(u32),
    Flush { addr: usize, len: usize },
}

/// Ordered log shared by all fakes of one test.
#[derive(Clone, Default)]
pub struct Trace {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Trace {
    pub fn new() -> Self { Self::default() }

    pub fn push(
        &self,
        event: Event,
    ) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> { self.events.borrow().clone() }

    pub fn clear(&self) { self.events.borrow_mut().clear(); }

    /// Values written to `offset`, in order.
    pub fn writes_to(
        &self,
        offset: usize,
    ) -> Vec<u32> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match *e {
                Event::Write { offset: o, value } if o == offset => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match *e {
                Event::Delay(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    pub fn flushes(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Flush { .. }))
            .count()
    }
}

// =============================================================================
// Registers
// =============================================================================

/// Register window that records writes and reads back the last value written.
///
/// The DMA status register is modelled separately: reads of the control
/// offset return whatever the test set with [`set_status`](Self::set_status).
#[derive(Clone)]
pub struct RecordingRegisters {
    trace: Trace,
    latched: Rc<RefCell<HashMap<usize, u32>>>,
    status: Rc<Cell<u32>>,
}

impl RecordingRegisters {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            latched: Rc::default(),
            status: Rc::default(),
        }
    }

    pub fn set_status(
        &self,
        status: u32,
    ) {
        self.status.set(status);
    }
}

impl RegisterBlock for RecordingRegisters {
    fn read(
        &self,
        offset: usize,
    ) -> u32 {
        if offset == DMA_CONTROL {
            return self.status.get();
        }
        self.latched.borrow().get(&offset).copied().unwrap_or(0)
    }

    fn write(
        &mut self,
        offset: usize,
        value: u32,
    ) {
        self.latched.borrow_mut().insert(offset, value);
        self.trace.push(Event::Write { offset, value });
    }
}

// =============================================================================
// Clock and Cache
// =============================================================================

/// Simulated clock: delays return at once and advance virtual time.
pub struct SimClock {
    trace: Trace,
    now_ms: u64,
}

impl SimClock {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            now_ms: 0,
        }
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 { self.now_ms }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        self.now_ms += u64::from(ms);
        self.trace.push(Event::Delay(ms));
    }
}

/// Cache that records the byte range of every flush.
pub struct RecordingCache {
    trace: Trace,
}

impl RecordingCache {
    pub fn new(trace: &Trace) -> Self { Self { trace: trace.clone() } }
}

impl DataCache for RecordingCache {
    fn flush(
        &mut self,
        words: &[u32],
    ) {
        self.trace.push(Event::Flush {
            addr: words.as_ptr() as usize,
            len: words.len() * WORD_BYTES,
        });
    }
}

// =============================================================================
// Frame Sources
// =============================================================================

/// Pixel words of test frame `seed`: the seed in the top byte, the pixel index below.
pub fn frame_words(
    seed: u8,
    pixels: usize,
) -> Vec<u32> {
    (0..pixels).map(|i| (u32::from(seed) << 24) | (i as u32 & 0x00FF_FFFF)).collect()
}

/// Little-endian byte stream of [`frame_words`].
pub fn frame_bytes(
    seed: u8,
    pixels: usize,
) -> Vec<u8> {
    frame_words(seed, pixels).iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// In-memory byte stream with optional chunking and failure injection.
pub struct VecSource {
    bytes: Vec<u8>,
    position: usize,
    chunk: usize,
    fail_after: Option<usize>,
}

impl VecSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            position: 0,
            chunk: usize::MAX,
            fail_after: None,
        }
    }

    /// Return at most `chunk` bytes per read.
    pub fn with_chunk(
        mut self,
        chunk: usize,
    ) -> Self {
        self.chunk = chunk;
        self
    }

    /// Fail every read once `bytes` bytes have been delivered.
    pub fn fail_after(
        mut self,
        bytes: usize,
    ) -> Self {
        self.fail_after = Some(bytes);
        self.chunk = self.chunk.min(bytes);
        self
    }
}

impl FrameSource for VecSource {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, SourceError> {
        if self.fail_after.is_some_and(|limit| self.position >= limit) {
            return Err(SourceError::Read);
        }
        let remaining = &self.bytes[self.position..];
        let n = buf.len().min(remaining.len()).min(self.chunk);
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

/// Provider serving one in-memory stream per frame.
pub struct VecProvider {
    frames: Vec<Vec<u8>>,
    fail_open_at: Option<usize>,
}

impl VecProvider {
    /// `count` full frames, frame `i` built from seed `i`.
    pub fn distinct(
        count: usize,
        pixels: usize,
    ) -> Self {
        Self {
            frames: (0..count).map(|i| frame_bytes(i as u8, pixels)).collect(),
            fail_open_at: None,
        }
    }

    /// Refuse to open frame `index`.
    pub fn fail_open_at(
        mut self,
        index: usize,
    ) -> Self {
        self.fail_open_at = Some(index);
        self
    }

    /// Cut frame `index` down to `words` whole words.
    pub fn truncate(
        mut self,
        index: usize,
        words: usize,
    ) -> Self {
        self.frames[index].truncate(words * WORD_BYTES);
        self
    }
}

impl SourceProvider for VecProvider {
    type Source = VecSource;

    fn open(
        &mut self,
        index: usize,
    ) -> Result<VecSource, SourceError> {
        if self.fail_open_at == Some(index) {
            return Err(SourceError::Open);
        }
        self.frames.get(index).cloned().map(VecSource::new).ok_or(SourceError::Open)
    }
}
