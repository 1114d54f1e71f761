//! Error taxonomy
//!
//! Recoverable failures are returned as [`Error`]. Peripheral configuration
//! failures are not recoverable: they go through [`fatal`], which logs the
//! cause and halts (on target `panic-probe` takes over from there).

use core::fmt;

use crate::hal::{ConversionFault, ConverterError, PinError};

/// Which lookup table an out-of-range index was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexKind {
    /// Logical digital pin (0-15)
    DigitalPin,
    /// Logical analog pin (0-5)
    AnalogPin,
    /// Pin mode preset (0-5)
    PinMode,
    /// Digital pin with an edge interrupt (2, 4, 7, 10)
    EdgePin,
    /// Edge mode (0-3)
    EdgeMode,
}

/// Recoverable board-support errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Index outside the range of the addressed table
    InvalidIndex { kind: IndexKind, index: usize },
    /// Valid index for a resource this board variant does not have
    Unavailable { kind: IndexKind, index: usize },
    /// The digital driver reported a read/write failure
    Pin(PinError),
    /// The converter reported a fault while a conversion was in flight
    ConversionFailed(ConversionFault),
    /// A bounded wait expired before the lock or the conversion became available
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidIndex { kind, index } => {
                write!(f, "index {} out of range for {:?}", index, kind)
            }
            Error::Unavailable { kind, index } => {
                write!(f, "{:?} {} not available on this board", kind, index)
            }
            Error::Pin(e) => write!(f, "digital pin access failed: {:?}", e),
            Error::ConversionFailed(fault) => write!(f, "analog conversion failed: {:?}", fault),
            Error::Timeout => f.write_str("timed out waiting for peripheral"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Error::Pin(e)
    }
}

/// Peripheral failure that leaves the hardware in an unknown configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalCause {
    Pin(PinError),
    Converter(ConverterError),
}

impl From<PinError> for FatalCause {
    fn from(e: PinError) -> Self {
        FatalCause::Pin(e)
    }
}

impl From<ConverterError> for FatalCause {
    fn from(e: ConverterError) -> Self {
        FatalCause::Converter(e)
    }
}

/// Log a peripheral misconfiguration and halt.
#[track_caller]
pub(crate) fn fatal(context: &'static str, cause: impl Into<FatalCause>) -> ! {
    let cause = cause.into();
    error!("fatal peripheral failure during {}: {:?}", context, cause);
    halt!("fatal peripheral failure during {}", context)
}
