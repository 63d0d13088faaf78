//! 32-bit register window access.
//!
//! Drivers never touch raw addresses. They own a [`RegisterBlock`] handle and
//! address registers by byte offset, so the bring-up script and DMA triggers
//! can be replayed against a recording fake on the host.

use core::ptr::{read_volatile, write_volatile};

/// A window of 32-bit registers addressed by byte offset.
pub trait RegisterBlock {
    /// Read the register at `offset`.
    fn read(
        &self,
        offset: usize,
    ) -> u32;

    /// Write `value` to the register at `offset`.
    fn write(
        &mut self,
        offset: usize,
        value: u32,
    );
}

/// Memory-mapped register window at a fixed physical base address.
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a handle to the register window at `base`.
    ///
    /// # Safety
    /// `base` must be the address of a device register window that is valid for
    /// volatile 32-bit access at every offset the owner uses, and no other
    /// handle may use the same offsets.
    pub const unsafe fn new(base: usize) -> Self { Self { base } }

    /// Base address of the window.
    #[inline]
    pub const fn base(&self) -> usize { self.base }
}

impl RegisterBlock for Mmio {
    #[inline]
    fn read(
        &self,
        offset: usize,
    ) -> u32 {
        // SAFETY: validity of base + offset is the constructor's contract
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write(
        &mut self,
        offset: usize,
        value: u32,
    ) {
        // SAFETY: validity of base + offset is the constructor's contract
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}
