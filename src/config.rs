//! Player configuration: geometry, memory map and cadence.
//!
//! # Memory Map
//!
//! The addresses below come from the Platform Designer system map of the
//! reference FPGA design (the soft core sees external DRAM through the HPS
//! bridge window, and the LCD controller IP exposes one 16-byte register
//! window). Regenerate them when the FPGA design changes.
//!
//! # Cadence Margin
//!
//! Playback never waits for DMA completion. Instead the frame interval must
//! cover a full frame transfer with margin, which [`PlayerConfig::validate`]
//! checks against a worst-case estimate derived from the panel write cycle.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::drivers::TransferDescriptor;
use crate::error::ConfigError;

// =============================================================================
// Frame Geometry
// =============================================================================

/// Panel width in pixels (landscape after MADCTL row/column exchange).
pub const FRAME_WIDTH: usize = 320;

/// Panel height in pixels.
pub const FRAME_HEIGHT: usize = 240;

/// Pixels per frame (76,800).
pub const FRAME_PIXELS: usize = FRAME_WIDTH * FRAME_HEIGHT;

/// Bytes per pixel word (packed `0x00RRGGBB`).
pub const WORD_BYTES: usize = 4;

/// Bytes per frame (307,200).
pub const FRAME_SPAN_BYTES: usize = FRAME_PIXELS * WORD_BYTES;

/// Number of frames in the animation.
pub const FRAME_COUNT: usize = 8;

// =============================================================================
// DMA and Playback
// =============================================================================

/// DMA transactions per burst.
pub const BURST_LENGTH: u32 = 16;

/// Pixels per DMA transaction. Pre-computed so that one descriptor covers one frame.
pub const TRANSFER_LENGTH: u32 = (FRAME_PIXELS as u32) / BURST_LENGTH;

/// Delay between frame triggers (10 frames per second).
pub const FRAME_INTERVAL_MS: u32 = 100;

/// Minimum ILI9341 8080-interface write cycle (tWC), one pixel per write.
pub const PANEL_WRITE_CYCLE_NS: u64 = 66;

/// Required ratio between frame interval and estimated transfer time.
pub const TRANSFER_MARGIN: u32 = 2;

// =============================================================================
// Memory Map
// =============================================================================

/// Base of the DRAM window holding the frame store.
pub const DRAM_WINDOW_BASE: u32 = 0x4000_0000;

/// Base of the LCD controller register window (DMA + panel registers).
pub const LCD_CONTROLLER_BASE: u32 = 0x0008_1000;

/// Base of the Nios V machine timer (`mtime` low/high words).
pub const MTIMER_BASE: u32 = 0x0009_0000;

/// Machine timer tick rate.
pub const MTIMER_HZ: u32 = 50_000_000;

/// Data cache line size used for flush loops.
pub const CACHE_LINE_BYTES: usize = 32;

// =============================================================================
// Test Pattern
// =============================================================================

/// Solid colours cycled through by the `test-pattern` build (red, blue).
pub const PATTERN_COLORS: [Rgb888; 2] = [Rgb888::RED, Rgb888::BLUE];

// =============================================================================
// Player Configuration
// =============================================================================

/// Tunable player parameters, validated once before startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayerConfig {
    /// Frames in the store (N).
    pub frame_count: usize,
    /// Pixel words per frame.
    pub frame_pixels: usize,
    /// DMA burst length.
    pub burst_length: u32,
    /// Sleep between triggers in milliseconds.
    pub frame_interval_ms: u32,
}

impl PlayerConfig {
    /// Reference configuration: 8 frames of 320x240, bursts of 16, 100 ms cadence.
    pub const DEFAULT: Self = Self {
        frame_count: FRAME_COUNT,
        frame_pixels: FRAME_PIXELS,
        burst_length: BURST_LENGTH,
        frame_interval_ms: FRAME_INTERVAL_MS,
    };

    /// Bytes occupied by one frame.
    #[inline]
    pub const fn frame_span_bytes(&self) -> usize { self.frame_pixels * WORD_BYTES }

    /// Words of backing memory needed for the whole store.
    #[inline]
    pub const fn store_words(&self) -> usize { self.frame_count * self.frame_pixels }

    /// Worst-case time for one frame to drain into the panel, rounded up to ms.
    pub const fn transfer_estimate_ms(&self) -> u32 {
        let ns = self.frame_pixels as u64 * PANEL_WRITE_CYCLE_NS;
        ns.div_ceil(1_000_000) as u32
    }

    /// Shortest frame interval accepted for this geometry.
    #[inline]
    pub const fn min_interval_ms(&self) -> u32 { self.transfer_estimate_ms() * TRANSFER_MARGIN }

    /// Check the configuration and derive the DMA descriptor.
    ///
    /// Fails if there are no frames, if the burst length does not split a
    /// frame into whole transactions, or if the cadence leaves less than
    /// [`TRANSFER_MARGIN`] times the estimated transfer time.
    pub fn validate(&self) -> Result<TransferDescriptor, ConfigError> {
        if self.frame_count == 0 || self.frame_pixels == 0 {
            return Err(ConfigError::EmptyStore);
        }

        let descriptor = TransferDescriptor::for_frame(self.frame_pixels, self.burst_length)?;

        let required_ms = self.min_interval_ms();
        if self.frame_interval_ms < required_ms {
            return Err(ConfigError::CadenceTooShort {
                interval_ms: self.frame_interval_ms,
                required_ms,
            });
        }

        Ok(descriptor)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self { Self::DEFAULT }
}

// =============================================================================
// Tests
// =============================================================================
