//! Time seam for bring-up delays and playback cadence.
//!
//! There is no scheduler: every wait is a busy wait on the single control
//! flow. [`Clock`] makes those waits injectable so tests can run the reset
//! pulse and the playback loop without real delays.

use embedded_hal::delay::DelayNs;

/// Monotonic millisecond time with blocking delays.
pub trait Clock {
    /// Milliseconds elapsed since the clock was created.
    fn now_ms(&self) -> u64;

    /// Block for at least `ms` milliseconds.
    fn delay_ms(
        &mut self,
        ms: u32,
    );
}

impl<T: Clock + ?Sized> Clock for &mut T {
    #[inline]
    fn now_ms(&self) -> u64 { (**self).now_ms() }

    #[inline]
    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        (**self).delay_ms(ms);
    }
}

/// [`Clock`] built from any `embedded-hal` delay provider.
///
/// Time only advances through delays issued on this clock, which is exact for
/// a single busy-waiting control flow that spends all its idle time here.
pub struct DelayClock<D> {
    delay: D,
    elapsed_ms: u64,
}

impl<D: DelayNs> DelayClock<D> {
    /// Wrap a delay provider. Elapsed time starts at zero.
    pub const fn new(delay: D) -> Self {
        Self {
            delay,
            elapsed_ms: 0,
        }
    }

    /// Release the wrapped delay provider.
    pub fn into_inner(self) -> D { self.delay }
}

impl<D: DelayNs> Clock for DelayClock<D> {
    #[inline]
    fn now_ms(&self) -> u64 { self.elapsed_ms }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        self.delay.delay_ms(ms);
        self.elapsed_ms += u64::from(ms);
    }
}

// =============================================================================
// Tests
// =============================================================================
