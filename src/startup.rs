//! Startup sequence: from raw peripherals to a running [`Player`].
//!
//! Order is fixed and every step must succeed before the next one runs:
//!
//! 1. Validate the configuration and derive the DMA descriptor
//! 2. Load every frame into the store (each flushed from the data cache)
//! 3. Pulse the panel reset and run the initialization script
//! 4. Reset the DMA engine and latch the descriptor
//! 5. Prime trigger of frame 0
//! 6. Memory Write, panel streaming
//! 7. One frame interval for the prime transfer, then playback from frame 1
//!
//! Loading comes first so that a missing or short frame aborts before the
//! panel or the engine is touched.

use crate::cache::DataCache;
use crate::clock::Clock;
use crate::config::PlayerConfig;
use crate::drivers::{DmaEngine, Panel};
use crate::error::StartupError;
use crate::frames::{FrameStore, SourceProvider};
use crate::playback::Player;
use crate::regs::RegisterBlock;

/// Hardware handles consumed by [`start`].
pub struct Peripherals<P, D, K, C> {
    /// Panel command/data register window.
    pub panel: P,
    /// DMA register window.
    pub dma: D,
    /// Data cache maintenance.
    pub cache: K,
    /// Delay source for reset timing and playback cadence.
    pub clock: C,
}

/// Run the startup sequence and return a player ready to [`run`](Player::run).
///
/// `memory` backs the frame store and `base` is its bus address as seen by
/// the DMA engine.
pub fn start<'m, Pr, P, D, K, C>(
    config: &PlayerConfig,
    memory: &'m mut [u32],
    base: u32,
    provider: &mut Pr,
    peripherals: Peripherals<P, D, K, C>,
) -> Result<Player<'m, P, D, C>, StartupError>
where
    Pr: SourceProvider + ?Sized,
    P: RegisterBlock,
    D: RegisterBlock,
    K: DataCache,
    C: Clock,
{
    let Peripherals {
        panel,
        dma,
        mut cache,
        mut clock,
    } = peripherals;

    let descriptor = config.validate()?;
    crate::log_info!(
        "Config: {} frames of {} px, interval {} ms (min {} ms)",
        config.frame_count,
        config.frame_pixels,
        config.frame_interval_ms,
        config.min_interval_ms()
    );

    let store = FrameStore::new(memory, base, config.frame_count, config.frame_pixels)?;
    let frames = store.load_all(provider, &mut cache)?;
    crate::log_info!("All {} frames loaded", frames.frame_count());

    let mut panel = Panel::new(panel);
    panel.bring_up(&mut clock)?;

    let mut dma = DmaEngine::new(dma).configure(descriptor);
    dma.trigger(frames.first().base());

    panel.arm_streaming()?;

    let player = Player::after_prime(frames, panel, dma, clock, config.frame_interval_ms)?;
    Ok(player)
}

// =============================================================================
// Tests
// =============================================================================
