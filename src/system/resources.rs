//! Hardware Resource Management
//!
//! Splits the RP2350 peripherals into the groups the board-support drivers
//! take ownership of.
//!
//! # Resource Groups
//! - Header: D0-D15 on GPIO0-15
//! - LEDs: LED1 sits on GPIO25 (QFN-60) or GPIO30 (QFN-80), LED2/LED3 on GPIO16/17
//! - Switches: SW1 on GPIO22 (QFN-60) or GPIO31-33 for SW1-SW3 (QFN-80)
//! - Analog: the converter itself, its pads are claimed by address
//!
//! Both package variants run the same image, so every group lists the pins
//! of both. [`detect_variant`] tells the drivers which ones are bonded out.

use assign_resources::assign_resources;
use board_support::BoardVariant;
use embassy_rp::{pac, peripherals};

assign_resources! {
    /// D0-D15 expansion header
    header: HeaderResources {
        d0: PIN_0,
        d1: PIN_1,
        d2: PIN_2,
        d3: PIN_3,
        d4: PIN_4,
        d5: PIN_5,
        d6: PIN_6,
        d7: PIN_7,
        d8: PIN_8,
        d9: PIN_9,
        d10: PIN_10,
        d11: PIN_11,
        d12: PIN_12,
        d13: PIN_13,
        d14: PIN_14,
        d15: PIN_15,
    },
    /// Onboard LEDs
    leds: LedResources {
        led1_compact: PIN_25,
        led1_standard: PIN_30,
        led2: PIN_16,
        led3: PIN_17,
    },
    /// Onboard switches, active low
    switches: SwitchResources {
        sw1_compact: PIN_22,
        sw1_standard: PIN_31,
        sw2: PIN_32,
        sw3: PIN_33,
    },
    /// Analog converter
    analog: AnalogResources {
        adc: ADC,
    },
}

/// Board variant from the package the firmware is running on
pub fn detect_variant() -> BoardVariant {
    // PACKAGE_SEL reads 1 on the QFN-60 part
    if pac::SYSINFO.package_sel().read().package_sel() {
        BoardVariant::Compact
    } else {
        BoardVariant::Standard
    }
}
