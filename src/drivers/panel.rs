//! Panel bring-up state machine.
//!
//! The panel is driven through a single register of the LCD controller. Each
//! 32-bit word written there is either a reset-line level or one 16-bit
//! payload tagged as command or data, terminal or continuation:
//!
//! | Kind | Word |
//! |------|------|
//! | Command | `value` |
//! | Command, continuation | `value \| 0x0010_0000` |
//! | Data | `value \| 0x0001_0000` |
//! | Data, continuation | `value \| 0x0011_0000` |
//!
//! A terminal word ends the logical command (chip select is released after
//! it). A continuation word keeps the panel selected because more parameter
//! bytes follow. The hardware does not report misframing, so the words come
//! from a fixed table ([`ili9341::INIT_SEQUENCE`]) rather than inline code.
//!
//! # States
//!
//! `Unpowered -> Reset -> Configuring -> Ready -> Streaming`
//!
//! Each operation checks the state it starts from and fails without touching
//! the hardware otherwise. There is no way back: reinitializing means building
//! a new [`Panel`].

use core::fmt;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::{RawData, RawU16};

use super::ili9341::{self, INIT_SEQUENCE, RAMWR};
use super::offset::PANEL;
use crate::clock::Clock;
use crate::error::PanelError;
use crate::regs::RegisterBlock;

/// Continuation flag: more words follow under the same command.
const CONTINUATION: u32 = 0x0010_0000;

/// Data flag: payload is a parameter/pixel, not a command.
const DATA: u32 = 0x0001_0000;

/// Reset line high (panel out of reset, display enabled).
pub const RESET_LINE_HIGH: u32 = 0x1300_0000;

/// Reset line low (panel held in reset, display enabled).
pub const RESET_LINE_LOW: u32 = 0x1100_0000;

/// Hold times of the reset pulse: high, low, high again.
pub const RESET_PULSE_MS: [u32; 3] = [1, 10, 120];

/// Bring-up state of the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelState {
    /// No command issued yet.
    Unpowered,
    /// Reset pulse complete, settle time elapsed.
    Reset,
    /// Initialization script in progress.
    Configuring,
    /// Script complete, display on.
    Ready,
    /// Memory write armed, panel consumes FIFO pixels on its own.
    Streaming,
}

impl fmt::Display for PanelState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Unpowered => "Unpowered",
            Self::Reset => "Reset",
            Self::Configuring => "Configuring",
            Self::Ready => "Ready",
            Self::Streaming => "Streaming",
        };
        f.write_str(name)
    }
}

/// Framing of one panel word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordKind {
    /// Command that ends here.
    Command,
    /// Command followed by parameter data.
    CommandContinuation,
    /// Last parameter of a command.
    Data,
    /// Parameter with more to follow.
    DataContinuation,
}

/// One entry of a panel command script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitStep {
    pub kind: WordKind,
    pub value: u16,
}

impl InitStep {
    /// Create a step of the given kind.
    pub const fn new(
        kind: WordKind,
        value: u16,
    ) -> Self {
        Self { kind, value }
    }

    /// Register word for this step.
    pub const fn encode(self) -> u32 {
        let value = self.value as u32;
        match self.kind {
            WordKind::Command => value,
            WordKind::CommandContinuation => value | CONTINUATION,
            WordKind::Data => value | DATA,
            WordKind::DataContinuation => value | DATA | CONTINUATION,
        }
    }
}

/// Panel driver owning the command/data register.
pub struct Panel<R> {
    regs: R,
    state: PanelState,
}

impl<R: RegisterBlock> Panel<R> {
    /// Take ownership of the panel register. The panel starts `Unpowered`.
    pub const fn new(regs: R) -> Self {
        Self {
            regs,
            state: PanelState::Unpowered,
        }
    }

    /// Current bring-up state.
    #[inline]
    pub const fn state(&self) -> PanelState { self.state }

    /// Pulse the reset line: high 1 ms, low 10 ms, high 120 ms.
    ///
    /// The final 120 ms is the settle time the panel needs before it accepts
    /// commands. None of the holds can be shortened.
    pub fn reset<C: Clock>(
        &mut self,
        clock: &mut C,
    ) -> Result<(), PanelError> {
        self.expect(PanelState::Unpowered)?;

        let levels = [RESET_LINE_HIGH, RESET_LINE_LOW, RESET_LINE_HIGH];
        for (level, hold_ms) in levels.into_iter().zip(RESET_PULSE_MS) {
            self.regs.write(PANEL, level);
            clock.delay_ms(hold_ms);
        }

        self.state = PanelState::Reset;
        crate::log_info!("Panel reset complete");
        Ok(())
    }

    /// Send the ILI9341 initialization script. Ends with the display on.
    pub fn configure(&mut self) -> Result<(), PanelError> { self.configure_with(INIT_SEQUENCE) }

    /// Send a custom initialization script in order.
    pub fn configure_with(
        &mut self,
        script: &[InitStep],
    ) -> Result<(), PanelError> {
        self.expect(PanelState::Reset)?;
        self.state = PanelState::Configuring;

        for step in script {
            self.send(*step);
        }

        self.state = PanelState::Ready;
        crate::log_info!("Panel configured: {} words", script.len());
        Ok(())
    }

    /// Reset followed by the initialization script.
    pub fn bring_up<C: Clock>(
        &mut self,
        clock: &mut C,
    ) -> Result<(), PanelError> {
        self.reset(clock)?;
        self.configure()
    }

    /// Issue Memory Write. From here the panel consumes every pixel the DMA
    /// pushes into its FIFO without further commands.
    pub fn arm_streaming(&mut self) -> Result<(), PanelError> {
        self.expect(PanelState::Ready)?;
        self.send(ili9341::command(RAMWR));
        self.state = PanelState::Streaming;
        crate::log_info!("Panel streaming");
        Ok(())
    }

    /// Fill panel memory with one colour through the register interface.
    ///
    /// Bypasses the DMA entirely, which isolates panel problems from transfer
    /// problems. Leaves the panel `Streaming` since it issues Memory Write.
    pub fn fill_direct(
        &mut self,
        color: Rgb565,
        pixels: usize,
    ) -> Result<(), PanelError> {
        self.expect(PanelState::Ready)?;
        self.send(ili9341::command(RAMWR));
        self.state = PanelState::Streaming;

        let raw = RawU16::from(color).into_inner();
        let word = InitStep::new(WordKind::Data, raw).encode();
        for _ in 0..pixels {
            self.regs.write(PANEL, word);
        }
        Ok(())
    }

    #[inline]
    fn send(
        &mut self,
        step: InitStep,
    ) {
        let word = step.encode();
        crate::log_trace!("Panel word {}", word);
        self.regs.write(PANEL, word);
    }

    fn expect(
        &self,
        expected: PanelState,
    ) -> Result<(), PanelError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PanelError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::RgbColor;

    use super::*;
    use crate::testing::{Event, RecordingRegisters, SimClock, Trace};

    fn panel(trace: &Trace) -> Panel<RecordingRegisters> { Panel::new(RecordingRegisters::new(trace)) }

    #[test]
    fn test_encode_word_kinds() {
        assert_eq!(InitStep::new(WordKind::Command, 0x0011).encode(), 0x0000_0011);
        assert_eq!(InitStep::new(WordKind::CommandContinuation, 0x00CF).encode(), 0x0010_00CF);
        assert_eq!(InitStep::new(WordKind::Data, 0x00C0).encode(), 0x0001_00C0);
        assert_eq!(InitStep::new(WordKind::DataContinuation, 0x0081).encode(), 0x0011_0081);
    }

    #[test]
    fn test_reset_pulse_order_and_timing() {
        let trace = Trace::new();
        let mut clock = SimClock::new(&trace);
        let mut panel = panel(&trace);

        panel.reset(&mut clock).unwrap();

        assert_eq!(
            trace.events(),
            vec![
                Event::Write {
                    offset: PANEL,
                    value: 0x1300_0000
                },
                Event::Delay(1),
                Event::Write {
                    offset: PANEL,
                    value: 0x1100_0000
                },
                Event::Delay(10),
                Event::Write {
                    offset: PANEL,
                    value: 0x1300_0000
                },
                Event::Delay(120),
            ]
        );
        assert_eq!(clock.now_ms(), 131);
        assert_eq!(panel.state(), PanelState::Reset);
    }

    #[test]
    fn test_configure_emits_canonical_script() {
        let trace = Trace::new();
        let mut clock = SimClock::new(&trace);
        let mut panel = panel(&trace);
        panel.reset(&mut clock).unwrap();
        trace.clear();

        panel.configure().unwrap();

        let expected: Vec<u32> = INIT_SEQUENCE.iter().map(|s| s.encode()).collect();
        assert_eq!(trace.writes_to(PANEL), expected);
        assert_eq!(panel.state(), PanelState::Ready);
        // No delays inside the script
        assert!(trace.delays().is_empty());
    }

    #[test]
    fn test_reordered_script_is_detected() {
        let canonical: Vec<u32> = INIT_SEQUENCE.iter().map(|s| s.encode()).collect();

        // Swap every adjacent pair that differs and check the emitted stream changes
        for i in 0..INIT_SEQUENCE.len() - 1 {
            if INIT_SEQUENCE[i] == INIT_SEQUENCE[i + 1] {
                continue;
            }
            let mut script = INIT_SEQUENCE.to_vec();
            script.swap(i, i + 1);

            let trace = Trace::new();
            let mut clock = SimClock::new(&trace);
            let mut panel = panel(&trace);
            panel.reset(&mut clock).unwrap();
            trace.clear();
            panel.configure_with(&script).unwrap();

            assert_ne!(trace.writes_to(PANEL), canonical, "swap at {i} went unnoticed");
        }
    }

    #[test]
    fn test_arm_streaming_sends_memory_write() {
        let trace = Trace::new();
        let mut clock = SimClock::new(&trace);
        let mut panel = panel(&trace);
        panel.bring_up(&mut clock).unwrap();
        trace.clear();

        panel.arm_streaming().unwrap();

        assert_eq!(trace.writes_to(PANEL), vec![0x0000_002C]);
        assert_eq!(panel.state(), PanelState::Streaming);
    }

    #[test]
    fn test_out_of_order_calls_rejected() {
        let trace = Trace::new();
        let mut clock = SimClock::new(&trace);
        let mut panel = panel(&trace);

        assert_eq!(
            panel.configure(),
            Err(PanelError::InvalidState {
                expected: PanelState::Reset,
                actual: PanelState::Unpowered,
            })
        );
        assert_eq!(
            panel.arm_streaming(),
            Err(PanelError::InvalidState {
                expected: PanelState::Ready,
                actual: PanelState::Unpowered,
            })
        );
        // Rejected calls leave the hardware untouched
        assert!(trace.events().is_empty());

        panel.bring_up(&mut clock).unwrap();
        panel.arm_streaming().unwrap();

        // No path back from Streaming
        assert_eq!(
            panel.reset(&mut clock),
            Err(PanelError::InvalidState {
                expected: PanelState::Unpowered,
                actual: PanelState::Streaming,
            })
        );
    }

    #[test]
    fn test_states_advance_monotonically() {
        let trace = Trace::new();
        let mut clock = SimClock::new(&trace);
        let mut panel = panel(&trace);

        let mut seen = vec![panel.state()];
        panel.reset(&mut clock).unwrap();
        seen.push(panel.state());
        panel.configure().unwrap();
        seen.push(panel.state());
        panel.arm_streaming().unwrap();
        seen.push(panel.state());

        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_fill_direct_writes_pixels() {
        let trace = Trace::new();
        let mut clock = SimClock::new(&trace);
        let mut panel = panel(&trace);
        panel.bring_up(&mut clock).unwrap();
        trace.clear();

        panel.fill_direct(Rgb565::RED, 4).unwrap();

        assert_eq!(
            trace.writes_to(PANEL),
            vec![0x0000_002C, 0x0001_F800, 0x0001_F800, 0x0001_F800, 0x0001_F800]
        );
        assert_eq!(panel.state(), PanelState::Streaming);
    }
}
