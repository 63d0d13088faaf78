//! Leveled logging macros for library and firmware code.
//!
//! With the `defmt` feature enabled the macros forward to the matching `defmt`
//! macro (the firmware links `defmt-rtt` as the global logger). Without it,
//! the arguments are still type-checked through `format_args!` and then
//! discarded, so host builds and tests need no logger.
//!
//! Because both paths are compiled, logged values must implement
//! `core::fmt::Display` as well as `defmt::Format`. Only plain `{}`
//! placeholders are used.
//!
//! # Log Levels
//!
//! - `Trace`: individual panel words and DMA triggers
//! - `Debug`: playback cycle boundaries
//! - `Info`: startup progress
//! - `Warn`: timing margin violations (DMA still busy at trigger)
//! - `Error`: fatal startup failures
//!
//! # Usage
//!
//! ```ignore
//! use lcd_player::{log_info, log_warn};
//!
//! log_info!("Frame {} staged: {} words", index, words);
//! log_warn!("DMA busy at trigger of frame {}", index);
//! ```

/// Log a message at Trace level.
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log a message at Info level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

/// Log a message at Error level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
