//! Frame player firmware for the Nios V soft core.
//!
//! Loads eight 320x240 frames from the debug host into DRAM, brings up the
//! ILI9341 panel behind the LCD controller IP, then loops forever triggering
//! one DMA frame transfer every 100 ms.
//!
//! # Features
//!
//! - `test-pattern`: play solid red/blue frames instead of reading host files

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
#[cfg(not(feature = "test-pattern"))]
mod hostfs;
mod platform;

use lcd_player::config::{DRAM_WINDOW_BASE, LCD_CONTROLLER_BASE, MTIMER_BASE, MTIMER_HZ};
use lcd_player::startup::{self, Peripherals};
use lcd_player::{DelayClock, Mmio, PlayerConfig, log_error, log_info};
use {defmt_rtt as _, panic_halt as _};

use crate::platform::{MachineTimer, ZicbomCache};

#[riscv_rt::entry]
fn main() -> ! {
    log_info!("Frame player starting");

    let config = PlayerConfig::DEFAULT;

    // SAFETY: addresses from the system memory map. The panel and DMA
    // handles share one window but use disjoint offsets.
    let peripherals = unsafe {
        Peripherals {
            panel: Mmio::new(LCD_CONTROLLER_BASE as usize),
            dma: Mmio::new(LCD_CONTROLLER_BASE as usize),
            cache: ZicbomCache,
            clock: DelayClock::new(MachineTimer::new(MTIMER_BASE as usize, MTIMER_HZ)),
        }
    };

    // SAFETY: the DRAM window is reserved for the frame store
    let memory = unsafe { platform::frame_memory(DRAM_WINDOW_BASE, config.store_words()) };

    #[cfg(not(feature = "test-pattern"))]
    let mut provider = hostfs::HostFs;
    #[cfg(feature = "test-pattern")]
    let mut provider = lcd_player::frames::SolidPattern::new(&lcd_player::config::PATTERN_COLORS, config.frame_pixels);

    match startup::start(&config, memory, DRAM_WINDOW_BASE, &mut provider, peripherals) {
        Ok(player) => player.run(),
        Err(e) => {
            log_error!("Startup failed: {}", e);
            semihosting::process::exit(1)
        }
    }
}
