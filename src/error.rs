//! Error types for startup.
//!
//! Every error here is fatal: the firmware logs it and exits with a non-zero
//! status. Nothing is retried. Faults that happen after playback starts (DMA
//! stalls, misframed panel commands) cannot be observed by software and have
//! no variant here.

use core::fmt;

use crate::drivers::PanelState;

/// Failure reported by a frame source collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// The source could not be opened.
    Open,
    /// A read from an open source failed.
    Read,
}

/// Failure while populating the frame store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Source for the frame could not be opened.
    Open { index: usize },
    /// Source for the frame failed mid-read.
    Read { index: usize },
    /// Source ended before a full frame was read.
    ShortRead {
        index: usize,
        expected: usize,
        actual: usize,
    },
    /// Frame index is not in `[0, count)`.
    IndexOutOfRange { index: usize, count: usize },
    /// Frames must be loaded in order `0..count`.
    OutOfOrder { index: usize, expected: usize },
    /// Store sealed before every frame was loaded.
    Incomplete { loaded: usize, count: usize },
}

/// Invalid player or DMA configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Zero frames or zero pixels per frame.
    EmptyStore,
    /// Burst length must fit the 8-bit config field and be non-zero.
    BurstOutOfRange { burst_length: u32 },
    /// Transfer length must fit the 24-bit config field and be non-zero.
    TransferOutOfRange { transfer_length: u32 },
    /// `transfer_length * burst_length` does not equal the frame pixel count.
    DescriptorMismatch {
        transfer_length: u32,
        burst_length: u32,
        frame_pixels: usize,
    },
    /// Frame interval leaves too little time for one transfer.
    CadenceTooShort { interval_ms: u32, required_ms: u32 },
    /// Backing memory does not hold exactly `frame_count * frame_pixels` words.
    MemorySize { expected: usize, actual: usize },
    /// Frame store does not fit the 32-bit bus address space.
    AddressOverflow,
}

/// Panel driver operation issued in the wrong state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// The operation requires `expected` but the panel is in `actual`.
    InvalidState { expected: PanelState, actual: PanelState },
}

/// Any fatal startup condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    Config(ConfigError),
    Load(LoadError),
    Panel(PanelError),
}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self { Self::Config(e) }
}

impl From<LoadError> for StartupError {
    fn from(e: LoadError) -> Self { Self::Load(e) }
}

impl From<PanelError> for StartupError {
    fn from(e: PanelError) -> Self { Self::Panel(e) }
}

impl fmt::Display for SourceError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Open => f.write_str("cannot open source"),
            Self::Read => f.write_str("source read failed"),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::Open { index } => write!(f, "frame {index}: cannot open source"),
            Self::Read { index } => write!(f, "frame {index}: read failed"),
            Self::ShortRead {
                index,
                expected,
                actual,
            } => write!(f, "frame {index}: read {actual} of {expected} words"),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "frame {index} out of range (store holds {count})")
            }
            Self::OutOfOrder { index, expected } => {
                write!(f, "frame {index} loaded out of order (expected {expected})")
            }
            Self::Incomplete { loaded, count } => write!(f, "only {loaded} of {count} frames loaded"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::EmptyStore => f.write_str("frame store is empty"),
            Self::BurstOutOfRange { burst_length } => write!(f, "burst length {burst_length} not in 1..=255"),
            Self::TransferOutOfRange { transfer_length } => {
                write!(f, "transfer length {transfer_length} does not fit 24 bits")
            }
            Self::DescriptorMismatch {
                transfer_length,
                burst_length,
                frame_pixels,
            } => write!(
                f,
                "transfer {transfer_length} x burst {burst_length} does not cover {frame_pixels} pixels"
            ),
            Self::CadenceTooShort {
                interval_ms,
                required_ms,
            } => write!(f, "frame interval {interval_ms} ms below {required_ms} ms"),
            Self::MemorySize { expected, actual } => {
                write!(f, "frame memory holds {actual} words, expected {expected}")
            }
            Self::AddressOverflow => f.write_str("frame store exceeds 32-bit bus space"),
        }
    }
}

impl fmt::Display for PanelError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::InvalidState { expected, actual } => {
                write!(f, "panel is {actual}, operation requires {expected}")
            }
        }
    }
}

impl fmt::Display for StartupError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Load(e) => write!(f, "load: {e}"),
            Self::Panel(e) => write!(f, "panel: {e}"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        let e: StartupError = LoadError::Open { index: 2 }.into();
        assert_eq!(e, StartupError::Load(LoadError::Open { index: 2 }));

        let e: StartupError = ConfigError::EmptyStore.into();
        assert_eq!(e, StartupError::Config(ConfigError::EmptyStore));
    }

    #[test]
    fn test_display_short_read() {
        let e = StartupError::Load(LoadError::ShortRead {
            index: 5,
            expected: 76_800,
            actual: 38_400,
        });
        assert_eq!(e.to_string(), "load: frame 5: read 38400 of 76800 words");
    }

    #[test]
    fn test_display_panel_state() {
        let e = PanelError::InvalidState {
            expected: PanelState::Ready,
            actual: PanelState::Reset,
        };
        assert_eq!(e.to_string(), "panel is Reset, operation requires Ready");
    }
}
