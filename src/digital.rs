//! Digital Resource Arbiter
//!
//! Serializes every access to the digital port behind one lock and gives the
//! raw lines their board meaning:
//! - LEDs are lit when the line is high
//! - Switches are pressed when the line is low (no debouncing)
//! - Switches the board variant does not have read as released
//! - D0-D15 pack into a `u16`, bit i is logical pin i
//!
//! # Locking
//! Each operation holds the lock for its whole duration, so a `set_port`
//! is never interleaved with another task's port access. The guard is
//! dropped on every exit path, including early error returns.
//!
//! # Edge Interrupts
//! D2, D4, D7 and D10 can be armed with [`DigitalPort::set_edge_mode`]. The
//! board's GPIO interrupt path calls [`EdgeSignals::raise`] for the line and
//! [`DigitalPort::wait_edge`] returns. Waiting does not hold the port lock.
//! A raise with nobody waiting is kept until the next wait on that line;
//! arming clears it.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;

use crate::config::{Config, WaitPolicy};
use crate::error::{fatal, Error};
use crate::hal::{DigitalIo, Level};
use crate::registry::{
    edge_line, edge_mode, mode_preset, pin_mapping, BoardPins, BoardVariant, PinMode,
    DIGITAL_PINS, EDGE_LINE_COUNT,
};

/// Onboard LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    /// Blue
    Led1,
    /// Green
    Led2,
    /// Red
    Led3,
}

/// Onboard push buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Switch {
    Switch1,
    /// Standard variant only
    Switch2,
    /// Standard variant only
    Switch3,
}

/// One latched flag per edge line, raised from interrupt context
pub struct EdgeSignals<M: RawMutex> {
    lines: [Signal<M, ()>; EDGE_LINE_COUNT],
}

impl<M: RawMutex> EdgeSignals<M> {
    pub const fn new() -> Self {
        Self {
            lines: [const { Signal::new() }; EDGE_LINE_COUNT],
        }
    }

    /// An armed edge occurred on `line`. Unknown lines are ignored.
    pub fn raise(&self, line: usize) {
        if let Some(signal) = self.lines.get(line) {
            signal.signal(());
        }
    }

    fn reset(&self, line: usize) {
        self.lines[line].reset();
    }

    async fn wait(&self, line: usize) {
        self.lines[line].wait().await
    }
}

impl<M: RawMutex> Default for EdgeSignals<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared digital port
pub struct DigitalPort<'a, M: RawMutex, IO> {
    io: Mutex<M, IO>,
    edges: &'a EdgeSignals<M>,
    variant: BoardVariant,
    board: &'static BoardPins,
    wait: WaitPolicy,
}

impl<'a, M: RawMutex, IO: DigitalIo> DigitalPort<'a, M, IO> {
    /// `edges` must be the signals the board's GPIO interrupt raises
    pub fn new(io: IO, edges: &'a EdgeSignals<M>, config: Config) -> Self {
        Self {
            io: Mutex::new(io),
            edges,
            variant: config.variant,
            board: config.variant.pins(),
            wait: config.wait,
        }
    }

    pub fn variant(&self) -> BoardVariant {
        self.variant
    }

    async fn lock(&self) -> Result<MutexGuard<'_, M, IO>, Error> {
        self.wait.wait(self.io.lock()).await
    }

    /// Light (`true`) or darken an LED
    pub async fn set_led(&self, led: Led, on: bool) -> Result<(), Error> {
        let pin = self.board.leds[led as usize];
        let mut io = self.lock().await?;
        io.write(pin, on.into())?;
        Ok(())
    }

    /// Whether an LED is lit
    pub async fn led(&self, led: Led) -> Result<bool, Error> {
        let pin = self.board.leds[led as usize];
        let mut io = self.lock().await?;
        Ok(io.read(pin)?.into())
    }

    /// Whether a switch is pressed
    pub async fn switch(&self, switch: Switch) -> Result<bool, Error> {
        let mut io = self.lock().await?;
        match self.board.switches[switch as usize] {
            Some(pin) => Ok(io.read(pin)? == Level::Low),
            None => Ok(false),
        }
    }

    /// Drive D0-D15 from `value`, least significant bit first
    pub async fn set_port(&self, value: u16) -> Result<(), Error> {
        let mut io = self.lock().await?;
        for (bit, mapping) in DIGITAL_PINS.iter().enumerate() {
            io.write(mapping.physical, Level::from(value & (1 << bit) != 0))?;
        }
        Ok(())
    }

    /// Sample D0-D15 into one value
    pub async fn port(&self) -> Result<u16, Error> {
        let mut io = self.lock().await?;
        let mut value = 0;
        for (bit, mapping) in DIGITAL_PINS.iter().enumerate() {
            if bool::from(io.read(mapping.physical)?) {
                value |= 1 << bit;
            }
        }
        Ok(value)
    }

    /// Drive logical pin `index`
    pub async fn set_pin(&self, index: usize, high: bool) -> Result<(), Error> {
        let pin = pin_mapping(index)?;
        let mut io = self.lock().await?;
        io.write(pin, high.into())?;
        Ok(())
    }

    /// Sample logical pin `index`
    pub async fn pin(&self, index: usize) -> Result<bool, Error> {
        let pin = pin_mapping(index)?;
        let mut io = self.lock().await?;
        Ok(io.read(pin)?.into())
    }

    /// Apply pin mode preset `mode` to logical pin `index`.
    ///
    /// A driver that rejects the preset leaves the pin in an unknown state,
    /// which is fatal.
    pub async fn set_pin_mode(&self, index: usize, mode: usize) -> Result<(), Error> {
        let pin = pin_mapping(index)?;
        let preset = mode_preset(mode)?;
        let mut io = self.lock().await?;
        if let Err(e) = io.configure(pin, preset) {
            fatal("pin mode configuration", e);
        }
        if preset.mode == PinMode::OutputPwm {
            debug!("D{} routed to PWM, duty cycle left to the PWM peripheral", index);
        }
        Ok(())
    }

    /// Arm edge mode `mode` on logical pin `index` (2, 4, 7 or 10).
    ///
    /// Mode 3 disarms the line and leaves the pin a plain input. Driver
    /// failure is fatal.
    pub async fn set_edge_mode(&self, index: usize, mode: usize) -> Result<(), Error> {
        let line = edge_line(index)?;
        let edge = edge_mode(mode)?;
        let pin = pin_mapping(index)?;
        let mut io = self.lock().await?;
        if let Err(e) = io.configure_edge(pin, edge) {
            fatal("edge configuration", e);
        }
        // an edge seen under the previous mode must not satisfy the next wait
        self.edges.reset(line);
        debug!("D{} edge mode {:?}", index, edge);
        Ok(())
    }

    /// Wait for the armed edge on logical pin `index` under `wait`
    pub async fn wait_edge(&self, index: usize, wait: WaitPolicy) -> Result<(), Error> {
        let line = edge_line(index)?;
        wait.wait(self.edges.wait(line)).await
    }

    /// Tear down, handing the driver back
    pub fn into_inner(self) -> IO {
        self.io.into_inner()
    }
}
