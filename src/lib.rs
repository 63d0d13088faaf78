//! LCD frame player library - testable modules for the frame player firmware.
//!
//! This library contains the frame staging, panel bring-up, DMA and playback
//! logic. The binary (`main.rs`) uses this library and adds the soft-core
//! specific code (entry point, machine timer, cache maintenance, host files).
//!
//! # Pipeline
//!
//! ```text
//! host files ──load──▶ FrameStore ──seal──▶ LoadedFrames
//!                                               │
//! Panel: reset ─▶ init script ─▶ Ready          │
//! Dma:   reset ─▶ descriptor  ─▶ prime trigger  │
//! Panel: RAMWR ─▶ Streaming                     ▼
//!                                Player: trigger ─▶ sleep ─▶ advance (mod N)
//! ```
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test --lib
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod logging;

pub mod cache;
pub mod clock;
pub mod config;
pub mod drivers;
pub mod error;
pub mod frames;
pub mod playback;
pub mod regs;
pub mod startup;

#[cfg(test)]
mod testing;

// Flat re-exports of the types the firmware binary wires together
pub use cache::DataCache;
pub use clock::{Clock, DelayClock};
pub use config::PlayerConfig;
pub use drivers::{ConfiguredDma, DmaEngine, Panel, PanelState, TransferDescriptor};
pub use error::{ConfigError, LoadError, PanelError, SourceError, StartupError};
pub use frames::{Frame, FrameSource, FrameStore, LoadedFrames, SourceProvider};
pub use playback::{FrameCursor, PlaybackStats, Player};
pub use regs::{Mmio, RegisterBlock};
