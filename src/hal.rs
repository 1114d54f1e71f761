//! Register-level driver seams
//!
//! The arbiters never touch registers themselves. A board provides one
//! [`DigitalIo`] and one [`AnalogConverter`]; the firmware binary implements
//! both for the RP2350, the tests implement them with recording mocks.

use crate::registry::{ChannelId, Edge, PhysicalPin, PinModePreset};

/// Electrical level of a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

/// Digital driver failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// The GPIO is not bonded out or not handed to the driver
    Unavailable(PhysicalPin),
    /// The driver cannot apply the requested mode
    Unsupported(PhysicalPin),
}

/// Converter driver failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConverterError {
    /// The channel does not exist on this package
    ChannelUnavailable(Channel),
    /// The converter did not become ready
    NotReady,
}

/// Fault reported from interrupt context for an in-flight conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionFault {
    /// A result was overwritten before it was read
    Overrun,
    /// The converter flagged the sample as invalid
    Hardware,
}

/// Converter input selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// External input behind an analog header pin
    Input(ChannelId),
    /// On-die temperature sensor
    Temperature,
    /// Supply rail through the board divider
    Supply,
}

/// Digital port driver
///
/// Called only by the holder of the digital port lock.
pub trait DigitalIo {
    /// Current electrical level of `pin`, whatever its direction
    fn read(&mut self, pin: PhysicalPin) -> Result<Level, PinError>;

    /// Drive `pin` to `level`
    fn write(&mut self, pin: PhysicalPin, level: Level) -> Result<(), PinError>;

    /// Apply direction and pull configuration
    fn configure(&mut self, pin: PhysicalPin, preset: PinModePreset) -> Result<(), PinError>;

    /// Make `pin` a floating input whose `edge` raises the board's
    /// [`EdgeSignals`](crate::digital::EdgeSignals) line, or disarm it with `None`
    fn configure_edge(&mut self, pin: PhysicalPin, edge: Option<Edge>) -> Result<(), PinError>;
}

/// Interrupt-driven analog converter driver
///
/// Completion is not reported through this trait: the board's interrupt
/// handler raises the [`CompletionSignal`](crate::analog::CompletionSignal)
/// handed to `Bsp::init`.
pub trait AnalogConverter {
    /// Select the channel for the next conversion
    fn configure_channel(&mut self, channel: Channel) -> Result<(), ConverterError>;

    /// Start one conversion with the completion interrupt enabled
    fn start(&mut self) -> Result<(), ConverterError>;

    /// Disable the completion interrupt and stop converting
    fn stop(&mut self);
}
