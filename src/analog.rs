//! Analog Conversion Coordinator
//!
//! Turns one interrupt-driven conversion into a single awaited call.
//!
//! # Conversion Protocol
//! ```text
//! Idle -> Configuring -> Converting -> Complete | Fault -> Idle
//! ```
//! 1. Take the converter lock (per [`WaitPolicy`])
//! 2. Clear the completion signal
//! 3. Select the channel (fatal on failure)
//! 4. Start the conversion with its interrupt enabled (fatal on failure)
//! 5. Await the completion signal raised by the interrupt handler
//! 6. Stop the converter, release the lock, return the outcome
//!
//! # Interrupt Side
//! The board's end-of-conversion handler calls [`CompletionSignal::complete`]
//! with the raw result, its error handler calls [`CompletionSignal::fault`].
//! Either call releases the waiting task exactly once; a fault reaches the
//! caller as [`Error::ConversionFailed`]. The signal is the only object the
//! interrupt handler touches.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;

use crate::config::{AnalogConfig, Config, WaitPolicy};
use crate::error::{fatal, Error, IndexKind};
use crate::hal::{AnalogConverter, Channel, ConversionFault};
use crate::registry::{analog_mapping, BoardPins, ANALOG_CHANNELS};

/// Largest 12-bit sample
pub const SAMPLE_MAX: u16 = 0x0FFF;

/// Number of converter steps (12-bit)
const ADC_RANGE: f32 = 4096.0;

/// Result slot written from interrupt context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionOutcome {
    Complete(u16),
    Fault(ConversionFault),
}

/// Single-permit handoff from the converter interrupt to the waiting task
pub struct CompletionSignal<M: RawMutex> {
    signal: Signal<M, ConversionOutcome>,
}

impl<M: RawMutex> CompletionSignal<M> {
    pub const fn new() -> Self {
        Self { signal: Signal::new() }
    }

    /// End-of-conversion: hand over the raw result register value
    pub fn complete(&self, raw: u16) {
        self.signal.signal(ConversionOutcome::Complete(raw));
    }

    /// Converter error: release the waiter without a sample
    pub fn fault(&self, fault: ConversionFault) {
        error!("converter fault: {:?}", fault);
        self.signal.signal(ConversionOutcome::Fault(fault));
    }

    fn reset(&self) {
        self.signal.reset();
    }

    async fn wait(&self) -> ConversionOutcome {
        self.signal.wait().await
    }
}

impl<M: RawMutex> Default for CompletionSignal<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Converter held for one conversion; stops it on every exit path,
/// including a dropped future
struct Conversion<'g, M: RawMutex, C: AnalogConverter> {
    converter: MutexGuard<'g, M, C>,
}

impl<M: RawMutex, C: AnalogConverter> Drop for Conversion<'_, M, C> {
    fn drop(&mut self) {
        self.converter.stop();
    }
}

/// Shared analog converter
pub struct AnalogPort<'a, M: RawMutex, C> {
    converter: Mutex<M, C>,
    done: &'a CompletionSignal<M>,
    board: &'static BoardPins,
    wait: WaitPolicy,
    calibration: AnalogConfig,
}

impl<'a, M: RawMutex, C: AnalogConverter> AnalogPort<'a, M, C> {
    /// Take ownership of the converter and select analog pin 0 as its
    /// default channel. A converter that rejects it is fatal.
    pub fn new(mut converter: C, done: &'a CompletionSignal<M>, config: Config) -> Self {
        let default = Channel::Input(ANALOG_CHANNELS[0].channel);
        if let Err(e) = converter.configure_channel(default) {
            fatal("default channel configuration", e);
        }
        done.reset();
        Self {
            converter: Mutex::new(converter),
            done,
            board: config.variant.pins(),
            wait: config.wait,
            calibration: config.analog,
        }
    }

    /// 12-bit sample of analog pin `index`, no scaling applied.
    ///
    /// Pins the board variant does not bond out return
    /// [`Error::Unavailable`] without touching the converter.
    pub async fn read(&self, index: usize) -> Result<u16, Error> {
        let channel = analog_mapping(index)?;
        if !self.board.has_analog(index) {
            return Err(Error::Unavailable { kind: IndexKind::AnalogPin, index });
        }
        self.convert(Channel::Input(channel)).await
    }

    /// On-die temperature in °C
    pub async fn read_temperature(&self) -> Result<f32, Error> {
        let sensor_mv = self.millivolts(self.convert(Channel::Temperature).await?);
        let cal = &self.calibration;
        Ok(27.0 - (sensor_mv - cal.sensor_mv_at_27c) / cal.sensor_mv_per_c)
    }

    /// Supply rail in millivolts
    pub async fn read_supply_mv(&self) -> Result<u32, Error> {
        let channel_mv = self.millivolts(self.convert(Channel::Supply).await?);
        Ok((channel_mv * self.calibration.supply_divider as f32) as u32)
    }

    fn millivolts(&self, raw: u16) -> f32 {
        f32::from(raw) * self.calibration.reference_mv as f32 / ADC_RANGE
    }

    async fn convert(&self, channel: Channel) -> Result<u16, Error> {
        let mut conversion = Conversion {
            converter: self.wait.wait(self.converter.lock()).await?,
        };

        // a raise left over from an abandoned conversion must not satisfy this one
        self.done.reset();
        if let Err(e) = conversion.converter.configure_channel(channel) {
            fatal("channel configuration", e);
        }
        if let Err(e) = conversion.converter.start() {
            fatal("conversion start", e);
        }
        trace!("conversion started on {:?}", channel);

        match self.wait.wait(self.done.wait()).await {
            Ok(ConversionOutcome::Complete(raw)) => {
                debug!("conversion on {:?}: {}", channel, raw & SAMPLE_MAX);
                Ok(raw & SAMPLE_MAX)
            }
            Ok(ConversionOutcome::Fault(fault)) => Err(Error::ConversionFailed(fault)),
            Err(e) => {
                // still holding the lock; a raise after this point is cleared
                // by the next holder before it starts
                self.done.reset();
                warn!("conversion on {:?} did not complete in time", channel);
                Err(e)
            }
        }
    }

    /// Tear down, handing the converter back
    pub fn into_inner(self) -> C {
        self.converter.into_inner()
    }
}
