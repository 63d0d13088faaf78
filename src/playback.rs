//! Playback loop: one DMA trigger per frame at a fixed cadence, forever.
//!
//! ```text
//! ┌──▶ trigger(frame[i]) ──▶ delay(interval) ──▶ i = (i + 1) mod N ──┐
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Completion of a transfer is never awaited. Before each trigger the engine
//! status is sampled; a trigger issued while the previous transfer is still in
//! flight is counted and logged, then issued anyway.

use core::fmt;

use crate::clock::Clock;
use crate::drivers::{ConfiguredDma, Panel, PanelState};
use crate::error::PanelError;
use crate::frames::{Frame, LoadedFrames};
use crate::regs::RegisterBlock;

/// Wrapping index over the frames of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameCursor {
    index: usize,
    count: usize,
}

impl FrameCursor {
    /// Cursor at frame 0 of `count` frames (`count` must be non-zero).
    pub const fn new(count: usize) -> Self {
        debug_assert!(count > 0, "cursor over zero frames");
        Self { index: 0, count }
    }

    /// Index of the current frame.
    #[inline]
    pub const fn current(&self) -> usize { self.index }

    /// Move to the next frame, wrapping after the last. Returns the new index.
    #[inline]
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }

    /// Whether the cursor points at frame 0.
    #[inline]
    pub const fn is_at_start(&self) -> bool { self.index == 0 }
}

/// Counters kept by the playback loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackStats {
    /// Triggers issued.
    pub triggers: u64,
    /// Full passes over all frames.
    pub cycles: u64,
    /// Triggers issued while the engine still reported busy.
    pub overlapping_triggers: u64,
}

impl fmt::Display for PlaybackStats {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} triggers, {} cycles, {} overlapping",
            self.triggers, self.cycles, self.overlapping_triggers
        )
    }
}

/// Running player: streaming panel, configured engine, loaded frames.
pub struct Player<'m, P, D, C> {
    frames: LoadedFrames<'m>,
    panel: Panel<P>,
    dma: ConfiguredDma<D>,
    clock: C,
    cursor: FrameCursor,
    interval_ms: u32,
    stats: PlaybackStats,
}

impl<'m, P, D, C> Player<'m, P, D, C>
where
    P: RegisterBlock,
    D: RegisterBlock,
    C: Clock,
{
    /// Assemble a player. The panel must already be streaming.
    pub fn new(
        frames: LoadedFrames<'m>,
        panel: Panel<P>,
        dma: ConfiguredDma<D>,
        clock: C,
        interval_ms: u32,
    ) -> Result<Self, PanelError> {
        if panel.state() != PanelState::Streaming {
            return Err(PanelError::InvalidState {
                expected: PanelState::Streaming,
                actual: panel.state(),
            });
        }

        Ok(Self {
            cursor: FrameCursor::new(frames.frame_count()),
            frames,
            panel,
            dma,
            clock,
            interval_ms,
            stats: PlaybackStats::default(),
        })
    }

    /// Assemble a player whose first frame was already triggered during
    /// startup (the prime trigger).
    ///
    /// Waits out that frame's interval and continues with frame 1, so the
    /// prime transfer gets the same margin as every later one.
    pub fn after_prime(
        frames: LoadedFrames<'m>,
        panel: Panel<P>,
        dma: ConfiguredDma<D>,
        clock: C,
        interval_ms: u32,
    ) -> Result<Self, PanelError> {
        let mut player = Self::new(frames, panel, dma, clock, interval_ms)?;
        player.stats.triggers += 1;
        player.finish_frame();
        Ok(player)
    }

    /// Trigger the current frame, wait one interval, advance.
    ///
    /// Returns the frame that was triggered.
    pub fn step(&mut self) -> Frame {
        let frame = self.frames.frame_wrapping(self.cursor.current());

        if self.dma.is_busy() {
            self.stats.overlapping_triggers += 1;
            crate::log_warn!("DMA busy at trigger of frame {}", frame.index());
        }
        self.dma.trigger(frame.base());
        self.stats.triggers += 1;

        self.finish_frame();
        frame
    }

    fn finish_frame(&mut self) {
        self.clock.delay_ms(self.interval_ms);

        if self.cursor.advance() == 0 {
            self.stats.cycles += 1;
            crate::log_debug!("Playback cycle {} complete", self.stats.cycles);
        }
    }

    /// Play forever.
    pub fn run(mut self) -> ! {
        crate::log_info!(
            "Playback started: {} frames every {} ms",
            self.frames.frame_count(),
            self.interval_ms
        );
        loop {
            self.step();
        }
    }

    /// Counters so far.
    #[inline]
    pub const fn stats(&self) -> PlaybackStats { self.stats }

    /// Position of the next frame to trigger.
    #[inline]
    pub const fn cursor(&self) -> FrameCursor { self.cursor }

    /// Panel state (always `Streaming` once built).
    #[inline]
    pub const fn panel_state(&self) -> PanelState { self.panel.state() }

    /// Playback clock.
    #[inline]
    pub const fn clock(&self) -> &C { &self.clock }

    /// Frames being played.
    #[inline]
    pub const fn frames(&self) -> LoadedFrames<'m> { self.frames }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BURST_LENGTH, FRAME_COUNT, FRAME_INTERVAL_MS, FRAME_PIXELS, FRAME_SPAN_BYTES};
    use crate::drivers::offset::DMA_START;
    use crate::drivers::{DmaEngine, TransferDescriptor};
    use crate::frames::FrameStore;
    use crate::testing::{RecordingCache, RecordingRegisters, SimClock, Trace, VecProvider};

    const BASE: u32 = 0x4000_0000;

    fn frames<'a>(
        memory: &'a mut [u32],
        trace: &Trace,
    ) -> LoadedFrames<'a> {
        let store = FrameStore::new(memory, BASE, FRAME_COUNT, FRAME_PIXELS).unwrap();
        let mut provider = VecProvider::distinct(FRAME_COUNT, FRAME_PIXELS);
        store.load_all(&mut provider, &mut RecordingCache::new(trace)).unwrap()
    }

    fn streaming_panel(trace: &Trace) -> Panel<RecordingRegisters> {
        let mut panel = Panel::new(RecordingRegisters::new(trace));
        panel.bring_up(&mut SimClock::new(trace)).unwrap();
        panel.arm_streaming().unwrap();
        panel
    }

    fn dma(regs: RecordingRegisters) -> ConfiguredDma<RecordingRegisters> {
        let descriptor = TransferDescriptor::for_frame(FRAME_PIXELS, BURST_LENGTH).unwrap();
        DmaEngine::new(regs).configure(descriptor)
    }

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = FrameCursor::new(3);
        assert!(cursor.is_at_start());
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.advance(), 0);
        assert!(cursor.is_at_start());
    }

    #[test]
    fn test_single_frame_cursor() {
        let mut cursor = FrameCursor::new(1);
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cursor over zero frames")]
    fn test_empty_cursor_rejected() {
        let _ = FrameCursor::new(0);
    }

    #[test]
    fn test_after_prime_waits_then_continues_with_second_frame() {
        let trace = Trace::new();
        let mut memory = vec![0u32; FRAME_COUNT * FRAME_PIXELS];
        let frames = frames(&mut memory, &trace);
        let mut player = Player::after_prime(
            frames,
            streaming_panel(&trace),
            dma(RecordingRegisters::new(&trace)),
            SimClock::new(&trace),
            FRAME_INTERVAL_MS,
        )
        .unwrap();

        assert_eq!(player.cursor().current(), 1);
        assert_eq!(player.clock().now_ms(), u64::from(FRAME_INTERVAL_MS));
        assert_eq!(player.stats().triggers, 1);

        assert_eq!(player.step().index(), 1);
        for _ in 2..FRAME_COUNT {
            player.step();
        }
        // The prime trigger completes the first cycle
        assert!(player.cursor().is_at_start());
        assert_eq!(player.stats().cycles, 1);
        assert_eq!(player.stats().triggers, FRAME_COUNT as u64);
    }

    #[test]
    fn test_requires_streaming_panel() {
        let trace = Trace::new();
        let mut memory = vec![0u32; FRAME_COUNT * FRAME_PIXELS];
        let frames = frames(&mut memory, &trace);
        let panel = Panel::new(RecordingRegisters::new(&trace));

        let result = Player::new(frames, panel, dma(RecordingRegisters::new(&trace)), SimClock::new(&trace), 100);
        assert_eq!(
            result.err(),
            Some(PanelError::InvalidState {
                expected: PanelState::Streaming,
                actual: PanelState::Unpowered,
            })
        );
    }

    /// Scenario B: eight advances bring the cursor back to the base address.
    #[test]
    fn test_scenario_b_wraps_to_base() {
        let trace = Trace::new();
        let mut memory = vec![0u32; FRAME_COUNT * FRAME_PIXELS];
        let frames = frames(&mut memory, &trace);
        let mut player = Player::new(
            frames,
            streaming_panel(&trace),
            dma(RecordingRegisters::new(&trace)),
            SimClock::new(&trace),
            FRAME_INTERVAL_MS,
        )
        .unwrap();

        for _ in 0..FRAME_COUNT {
            player.step();
        }

        assert!(player.cursor().is_at_start());
        assert_eq!(player.frames().frame_wrapping(player.cursor().current()).base(), BASE);
        assert_eq!(player.stats().cycles, 1);
        assert_eq!(player.panel_state(), PanelState::Streaming);
    }

    #[test]
    fn test_trigger_sequence_is_periodic() {
        let trace = Trace::new();
        let mut memory = vec![0u32; FRAME_COUNT * FRAME_PIXELS];
        let frames = frames(&mut memory, &trace);
        let mut player = Player::new(
            frames,
            streaming_panel(&trace),
            dma(RecordingRegisters::new(&trace)),
            SimClock::new(&trace),
            FRAME_INTERVAL_MS,
        )
        .unwrap();
        trace.clear();

        let triggered: Vec<usize> = (0..3 * FRAME_COUNT).map(|_| player.step().index()).collect();

        let expected: Vec<usize> = (0..3 * FRAME_COUNT).map(|i| i % FRAME_COUNT).collect();
        assert_eq!(triggered, expected);

        let addresses = trace.writes_to(DMA_START);
        for (i, address) in addresses.iter().enumerate() {
            assert_eq!(*address, BASE + ((i % FRAME_COUNT) * FRAME_SPAN_BYTES) as u32);
        }
        assert_eq!(player.stats().triggers, 3 * FRAME_COUNT as u64);
        assert_eq!(player.stats().cycles, 3);
    }

    #[test]
    fn test_cadence_between_triggers() {
        let trace = Trace::new();
        let mut memory = vec![0u32; FRAME_COUNT * FRAME_PIXELS];
        let frames = frames(&mut memory, &trace);
        let mut player = Player::new(
            frames,
            streaming_panel(&trace),
            dma(RecordingRegisters::new(&trace)),
            SimClock::new(&trace),
            FRAME_INTERVAL_MS,
        )
        .unwrap();
        trace.clear();

        for _ in 0..4 {
            player.step();
        }

        // Exactly one interval after each trigger
        assert_eq!(trace.delays(), vec![FRAME_INTERVAL_MS; 4]);
        assert_eq!(player.clock().now_ms(), 4 * u64::from(FRAME_INTERVAL_MS));
    }

    #[test]
    fn test_overlapping_trigger_counted_and_issued() {
        let trace = Trace::new();
        let mut memory = vec![0u32; FRAME_COUNT * FRAME_PIXELS];
        let frames = frames(&mut memory, &trace);
        let regs = RecordingRegisters::new(&trace);
        let mut player = Player::new(
            frames,
            streaming_panel(&trace),
            dma(regs.clone()),
            SimClock::new(&trace),
            FRAME_INTERVAL_MS,
        )
        .unwrap();
        trace.clear();

        player.step();
        regs.set_status(2);
        player.step();
        regs.set_status(1);
        player.step();

        assert_eq!(player.stats().overlapping_triggers, 1);
        // The busy trigger still went out
        assert_eq!(trace.writes_to(DMA_START).len(), 3);
    }

    #[test]
    fn test_stats_display() {
        let stats = PlaybackStats {
            triggers: 16,
            cycles: 2,
            overlapping_triggers: 0,
        };
        assert_eq!(stats.to_string(), "16 triggers, 2 cycles, 0 overlapping");
    }
}
