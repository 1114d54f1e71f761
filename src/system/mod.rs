//! Core system components: resource split and the RP2350 drivers
pub mod adc;
pub mod gpio;
pub mod resources;
