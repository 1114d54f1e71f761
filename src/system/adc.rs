//! ADC driver for the analog port
//!
//! Runs single-shot conversions at register level so the end-of-conversion
//! interrupt can raise [`CONVERSION_DONE`] directly instead of going through
//! the async HAL driver.
//!
//! # Channel Routing
//! ```text
//!                 inputs      supply  temperature
//! QFN-60 (A)      0-2         3       4
//! QFN-80 (B)      0-6         7       8
//! ```
//! The analog pads are GPIO26-29 on the QFN-60 part and GPIO40-47 on QFN-80.

use board_support::hal::{AnalogConverter, Channel, ConversionFault, ConverterError};
use board_support::registry::{BoardVariant, ChannelId};
use board_support::CompletionSignal;
use embassy_rp::adc::{self, Adc, Blocking};
use embassy_rp::interrupt;
use embassy_rp::interrupt::InterruptExt;
use embassy_rp::peripherals::ADC;
use embassy_rp::{pac, Peri};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Raised from `ADC_IRQ_FIFO`, awaited by the analog port
pub static CONVERSION_DONE: CompletionSignal<CriticalSectionRawMutex> = CompletionSignal::new();

/// Register-level single-shot converter
pub struct RpConverter {
    _adc: Adc<'static, Blocking>,
    variant: BoardVariant,
}

impl RpConverter {
    pub fn new(adc: Peri<'static, ADC>, variant: BoardVariant) -> Self {
        // brings the block out of reset and waits for it to power up
        let adc = Adc::new_blocking(adc, adc::Config::default());

        for gpio in analog_pads(variant) {
            pac::PADS_BANK0.gpio(gpio).modify(|w| {
                w.set_ie(false);
                w.set_od(true);
                w.set_pue(false);
                w.set_pde(false);
                w.set_iso(false);
            });
        }
        pac::ADC.cs().modify(|w| w.set_ts_en(true));

        interrupt::ADC_IRQ_FIFO.unpend();
        unsafe { interrupt::ADC_IRQ_FIFO.enable() };

        Self { _adc: adc, variant }
    }

    fn ainsel(&self, channel: Channel) -> Option<u8> {
        match (self.variant, channel) {
            (BoardVariant::Compact, Channel::Input(ChannelId(id))) if id < 3 => Some(id),
            (BoardVariant::Standard, Channel::Input(ChannelId(id))) if id < 7 => Some(id),
            (BoardVariant::Compact, Channel::Supply) => Some(3),
            (BoardVariant::Standard, Channel::Supply) => Some(7),
            (BoardVariant::Compact, Channel::Temperature) => Some(4),
            (BoardVariant::Standard, Channel::Temperature) => Some(8),
            _ => None,
        }
    }
}

fn analog_pads(variant: BoardVariant) -> core::ops::Range<usize> {
    match variant {
        BoardVariant::Compact => 26..30,
        BoardVariant::Standard => 40..48,
    }
}

fn drain_fifo() {
    while !pac::ADC.fcs().read().empty() {
        let _ = pac::ADC.fifo().read();
    }
}

impl AnalogConverter for RpConverter {
    fn configure_channel(&mut self, channel: Channel) -> Result<(), ConverterError> {
        let ainsel = self
            .ainsel(channel)
            .ok_or(ConverterError::ChannelUnavailable(channel))?;
        pac::ADC.cs().modify(|w| w.set_ainsel(ainsel));
        Ok(())
    }

    fn start(&mut self) -> Result<(), ConverterError> {
        if !pac::ADC.cs().read().ready() {
            return Err(ConverterError::NotReady);
        }
        drain_fifo();
        pac::ADC.fcs().modify(|w| {
            w.set_en(true);
            w.set_err(true);
            w.set_thresh(1);
            // sticky, write 1 to clear
            w.set_over(true);
            w.set_under(true);
        });
        pac::ADC.inte().write(|w| w.set_fifo(true));
        pac::ADC.cs().modify(|w| w.set_start_once(true));
        Ok(())
    }

    fn stop(&mut self) {
        pac::ADC.inte().write(|w| w.set_fifo(false));
        pac::ADC.fcs().modify(|w| w.set_en(false));
        drain_fifo();
    }
}

#[interrupt]
unsafe fn ADC_IRQ_FIFO() {
    let fcs = pac::ADC.fcs().read();
    // one result per start
    pac::ADC.inte().write(|w| w.set_fifo(false));

    if fcs.over() {
        pac::ADC.fcs().modify(|w| w.set_over(true));
        drain_fifo();
        CONVERSION_DONE.fault(ConversionFault::Overrun);
        return;
    }

    let entry = pac::ADC.fifo().read();
    if entry.err() {
        CONVERSION_DONE.fault(ConversionFault::Hardware);
    } else {
        CONVERSION_DONE.complete(entry.val());
    }
}
