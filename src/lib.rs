//! Board support layer
//!
//! Arbitrates the shared digital port and the analog converter between
//! preemptive tasks, and turns the converter's completion interrupt into an
//! awaited call.
//!
//! # Components
//! - [`registry`]: logical pin, channel and mode tables, board variants
//! - [`digital`]: LEDs, switches, D0-D15 behind one lock, edge waits on
//!   D2, D4, D7 and D10
//! - [`analog`]: A0-A5 and internal channels behind one lock plus the
//!   interrupt completion signal
//! - [`bsp`]: construction and teardown of both
//!
//! The register-level drivers are supplied through the [`hal`] traits.

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod analog;
pub mod bsp;
pub mod config;
pub mod digital;
pub mod error;
pub mod hal;
pub mod registry;

#[cfg(test)]
mod testing;

pub use analog::{AnalogPort, CompletionSignal, ConversionOutcome, SAMPLE_MAX};
pub use bsp::{flag, Bsp};
pub use config::{AnalogConfig, BoardVariant, Config, WaitPolicy};
pub use digital::{DigitalPort, EdgeSignals, Led, Switch};
pub use error::Error;
