//! Nios V platform glue: machine timer delay, data cache flush, DRAM window.
//!
//! Binary-only; nothing here runs on the host.

use embedded_hal::delay::DelayNs;
use lcd_player::DataCache;
use lcd_player::config::CACHE_LINE_BYTES;

/// `mtime` low word offset.
const MTIME_LO: usize = 0x0;
/// `mtime` high word offset.
const MTIME_HI: usize = 0x4;

/// Busy-wait delay on the free-running machine timer.
pub struct MachineTimer {
    base: usize,
    ticks_per_us: u64,
}

impl MachineTimer {
    /// Timer at `base`, counting at `hz`.
    ///
    /// # Safety
    /// `base` must be the machine timer register window.
    pub const unsafe fn new(
        base: usize,
        hz: u32,
    ) -> Self {
        Self {
            base,
            ticks_per_us: hz as u64 / 1_000_000,
        }
    }

    /// Current 64-bit tick count.
    fn now(&self) -> u64 {
        let lo = (self.base + MTIME_LO) as *const u32;
        let hi = (self.base + MTIME_HI) as *const u32;
        loop {
            // SAFETY: register window validity is the constructor's contract
            let (h0, l, h1) = unsafe {
                (
                    core::ptr::read_volatile(hi),
                    core::ptr::read_volatile(lo),
                    core::ptr::read_volatile(hi),
                )
            };
            // Retry if the low word wrapped between the two high reads
            if h0 == h1 {
                return (u64::from(h0) << 32) | u64::from(l);
            }
        }
    }
}

impl DelayNs for MachineTimer {
    fn delay_ns(
        &mut self,
        ns: u32,
    ) {
        let ticks = (u64::from(ns) * self.ticks_per_us).div_ceil(1_000);
        let start = self.now();
        while self.now().wrapping_sub(start) < ticks {
            core::hint::spin_loop();
        }
    }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        let ticks = u64::from(ms) * 1_000 * self.ticks_per_us;
        let start = self.now();
        while self.now().wrapping_sub(start) < ticks {
            core::hint::spin_loop();
        }
    }
}

/// Data cache maintenance through Zicbom `cbo.flush`.
pub struct ZicbomCache;

impl DataCache for ZicbomCache {
    fn flush(
        &mut self,
        words: &[u32],
    ) {
        let start = words.as_ptr() as usize;
        let end = start + core::mem::size_of_val(words);
        let mut line = start & !(CACHE_LINE_BYTES - 1);

        while line < end {
            // SAFETY: cbo.flush only writes back and invalidates the line
            // holding `line`, which lies inside `words`.
            unsafe { core::arch::asm!(".insn i 0x0F, 2, x0, {0}, 2", in(reg) line) };
            line += CACHE_LINE_BYTES;
        }

        // SAFETY: ordering fence, no memory effects of its own
        unsafe { core::arch::asm!("fence rw, rw") };
    }
}

/// The frame store region inside the DRAM window.
///
/// # Safety
/// `base` must be the CPU address of `words` words of RAM reachable by the DMA
/// engine at the same address, and the region must not be used elsewhere.
pub unsafe fn frame_memory(
    base: u32,
    words: usize,
) -> &'static mut [u32] {
    // SAFETY: forwarded to the caller
    unsafe { core::slice::from_raw_parts_mut(base as usize as *mut u32, words) }
}
