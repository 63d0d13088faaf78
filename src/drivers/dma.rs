//! Transfer engine (DMA) driver.
//!
//! The engine copies one frame from DRAM into the panel FIFO on its own once
//! triggered. It is reset and given its descriptor exactly once. That rule is
//! carried by the types: [`DmaEngine::configure`] consumes the idle engine and
//! returns a [`ConfiguredDma`], which is the only type that can trigger.
//!
//! Completion is never awaited. The playback cadence provides the margin (see
//! [`PlayerConfig::validate`](crate::config::PlayerConfig::validate)).

use super::offset::{DMA_CONFIG, DMA_CONTROL, DMA_START};
use crate::error::ConfigError;
use crate::regs::RegisterBlock;

/// Largest transfer length representable in the config word (24 bits).
pub const MAX_TRANSFER_LENGTH: u32 = 0x00FF_FFFF;

/// Largest burst length representable in the config word (8 bits).
pub const MAX_BURST_LENGTH: u32 = 0xFF;

/// Value written to the control register to reset the engine.
const RESET: u32 = 1;

/// Status values above this mean a transfer is in flight.
const STATUS_IDLE_MAX: u32 = 1;

/// Transfer length and burst length covering exactly one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferDescriptor {
    transfer_length: u32,
    burst_length: u32,
}

impl TransferDescriptor {
    /// Validate an explicit descriptor against the frame size.
    ///
    /// Both fields must be non-zero and fit their config word fields, and
    /// `transfer_length * burst_length` must equal `frame_pixels`.
    pub fn new(
        transfer_length: u32,
        burst_length: u32,
        frame_pixels: usize,
    ) -> Result<Self, ConfigError> {
        if burst_length == 0 || burst_length > MAX_BURST_LENGTH {
            return Err(ConfigError::BurstOutOfRange { burst_length });
        }
        if transfer_length == 0 || transfer_length > MAX_TRANSFER_LENGTH {
            return Err(ConfigError::TransferOutOfRange { transfer_length });
        }

        let covered = u64::from(transfer_length) * u64::from(burst_length);
        if covered != frame_pixels as u64 {
            return Err(ConfigError::DescriptorMismatch {
                transfer_length,
                burst_length,
                frame_pixels,
            });
        }

        Ok(Self {
            transfer_length,
            burst_length,
        })
    }

    /// Derive the descriptor for a frame from its burst length.
    pub fn for_frame(
        frame_pixels: usize,
        burst_length: u32,
    ) -> Result<Self, ConfigError> {
        if burst_length == 0 || burst_length > MAX_BURST_LENGTH {
            return Err(ConfigError::BurstOutOfRange { burst_length });
        }
        let transfer_length = u32::try_from(frame_pixels / burst_length as usize)
            .map_err(|_| ConfigError::TransferOutOfRange { transfer_length: u32::MAX })?;
        Self::new(transfer_length, burst_length, frame_pixels)
    }

    /// Pixels per transaction.
    #[inline]
    pub const fn transfer_length(&self) -> u32 { self.transfer_length }

    /// Transactions per burst.
    #[inline]
    pub const fn burst_length(&self) -> u32 { self.burst_length }

    /// Pixels moved per trigger.
    #[inline]
    pub const fn pixels(&self) -> u64 { self.transfer_length as u64 * self.burst_length as u64 }

    /// Config register encoding: `(transfer_length << 8) | burst_length`.
    #[inline]
    pub const fn encode(&self) -> u32 { (self.transfer_length << 8) | self.burst_length }
}

/// Transfer engine that has not been configured yet.
pub struct DmaEngine<R> {
    regs: R,
}

impl<R: RegisterBlock> DmaEngine<R> {
    /// Take ownership of the engine's registers.
    pub const fn new(regs: R) -> Self { Self { regs } }

    /// Reset the engine to idle, then latch the descriptor.
    pub fn configure(
        mut self,
        descriptor: TransferDescriptor,
    ) -> ConfiguredDma<R> {
        self.regs.write(DMA_CONTROL, RESET);
        self.regs.write(DMA_CONFIG, descriptor.encode());
        crate::log_debug!(
            "DMA configured: transfer {} x burst {}",
            descriptor.transfer_length(),
            descriptor.burst_length()
        );
        ConfiguredDma {
            regs: self.regs,
            descriptor,
        }
    }
}

/// Transfer engine with a latched descriptor, ready to trigger.
pub struct ConfiguredDma<R> {
    regs: R,
    descriptor: TransferDescriptor,
}

impl<R: RegisterBlock> ConfiguredDma<R> {
    /// Start copying one frame from `source` (bus address). Returns immediately.
    #[inline]
    pub fn trigger(
        &mut self,
        source: u32,
    ) {
        crate::log_trace!("DMA trigger {}", source);
        self.regs.write(DMA_START, source);
    }

    /// Whether the engine reports a transfer in flight.
    #[inline]
    pub fn is_busy(&self) -> bool { self.regs.read(DMA_CONTROL) > STATUS_IDLE_MAX }

    /// Read back the latched config register.
    #[inline]
    pub fn config_word(&self) -> u32 { self.regs.read(DMA_CONFIG) }

    /// Descriptor latched at configuration.
    #[inline]
    pub const fn descriptor(&self) -> TransferDescriptor { self.descriptor }
}

// =============================================================================
// Tests
// =============================================================================
