//! Drivers for the LCD controller IP block.
//!
//! - `dma`: Transfer engine (reset, descriptor, trigger, busy status)
//! - `panel`: Panel bring-up state machine over the command/data register
//! - `ili9341`: Panel command set and the fixed initialization script
//!
//! # Register Window
//!
//! | Offset | Write | Read |
//! |--------|-------|------|
//! | 0 | DMA start (source address) | - |
//! | 4 | DMA config `(transfer << 8) \| burst` | latched config |
//! | 8 | DMA reset (1) | status, busy iff > 1 |
//! | 12 | Panel command/data word | - |

mod dma;
pub mod ili9341;
mod panel;

pub use dma::{ConfiguredDma, DmaEngine, TransferDescriptor};
pub use panel::{InitStep, Panel, PanelState, RESET_LINE_HIGH, RESET_LINE_LOW, RESET_PULSE_MS, WordKind};

/// Register offsets inside the LCD controller window.
pub mod offset {
    /// DMA start: write the frame's source address.
    pub const DMA_START: usize = 0;
    /// DMA configuration: transfer and burst length.
    pub const DMA_CONFIG: usize = 4;
    /// DMA reset on write, status on read.
    pub const DMA_CONTROL: usize = 8;
    /// Panel command/data/reset-line word.
    pub const PANEL: usize = 12;
}
