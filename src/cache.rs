//! Data cache maintenance seam.
//!
//! The DMA engine reads DRAM directly and never sees lines still dirty in the
//! processor's data cache. Every write the CPU makes to the frame store must
//! be followed by a flush of the written range before the first trigger.

/// Write-back of cached data to memory.
pub trait DataCache {
    /// Write back (and invalidate) every cache line covering `words`.
    fn flush(
        &mut self,
        words: &[u32],
    );
}

impl<T: DataCache + ?Sized> DataCache for &mut T {
    #[inline]
    fn flush(
        &mut self,
        words: &[u32],
    ) {
        (**self).flush(words);
    }
}
