//! Resource Registry
//!
//! Compile-time tables mapping logical identifiers to physical resources:
//! - 16 digital header pins (D0-D15)
//! - 6 analog header pins (A0-A5) and their converter channels
//! - 6 pin mode presets
//! - 4 edge-interrupt lines (D2, D4, D7, D10) and 4 edge modes
//! - LED, switch and analog availability for both board variants
//!
//! The RP2350 exposes all user GPIOs in a single bank, so a physical pin is
//! fully described by its GPIO number.
//!
//! # Board Layout
//! ```text
//!            compact (RP2350A)   standard (RP2350B)
//! LED1       GPIO25              GPIO30
//! LED2       GPIO16              GPIO16
//! LED3       GPIO17              GPIO17
//! Switch1    GPIO22              GPIO31
//! Switch2    -                   GPIO32
//! Switch3    -                   GPIO33
//! A0-A1      yes                 yes
//! A2-A5      -                   yes
//! ```

use crate::error::{Error, IndexKind};

/// Number of logical digital pins
pub const DIGITAL_PIN_COUNT: usize = 16;

/// Number of logical analog pins
pub const ANALOG_PIN_COUNT: usize = 6;

/// Number of pin mode presets
pub const PIN_MODE_COUNT: usize = 6;

/// Number of digital pins with an edge interrupt
pub const EDGE_LINE_COUNT: usize = 4;

/// Number of edge modes
pub const EDGE_MODE_COUNT: usize = 4;

/// A physical GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhysicalPin(pub u8);

impl PhysicalPin {
    /// GPIO number
    pub const fn gpio(self) -> u8 {
        self.0
    }
}

/// Converter input channel id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(pub u8);

/// Logical digital pin to GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMapping {
    pub logical: u8,
    pub physical: PhysicalPin,
}

/// Logical analog pin to converter channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogChannelMapping {
    pub logical: u8,
    pub channel: ChannelId,
}

/// Electrical function of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    OutputPushPull,
    OutputOpenDrain,
    /// Routed to the PWM peripheral; duty cycle control is not provided
    OutputPwm,
}

/// Internal pull resistor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Edge that raises a line's interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

/// Mode and pull applied together by `set_pin_mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinModePreset {
    pub mode: PinMode,
    pub pull: Pull,
}

const fn pin(logical: u8, gpio: u8) -> PinMapping {
    PinMapping {
        logical,
        physical: PhysicalPin(gpio),
    }
}

const fn analog(logical: u8, channel: u8) -> AnalogChannelMapping {
    AnalogChannelMapping {
        logical,
        channel: ChannelId(channel),
    }
}

/// D0-D15, bit i of a port value is entry i
pub static DIGITAL_PINS: [PinMapping; DIGITAL_PIN_COUNT] = [
    pin(0, 0),
    pin(1, 1),
    pin(2, 2),
    pin(3, 3),
    pin(4, 4),
    pin(5, 5),
    pin(6, 6),
    pin(7, 7),
    pin(8, 8),
    pin(9, 9),
    pin(10, 10),
    pin(11, 11),
    pin(12, 12),
    pin(13, 13),
    pin(14, 14),
    pin(15, 15),
];

/// A0-A5. The header is wired in board order, not channel order.
pub static ANALOG_CHANNELS: [AnalogChannelMapping; ANALOG_PIN_COUNT] = [
    analog(0, 1),
    analog(1, 2),
    analog(2, 6),
    analog(3, 5),
    analog(4, 4),
    analog(5, 3),
];

/// 0 in, 1 in pull-up, 2 in pull-down, 3 out push-pull, 4 out open-drain, 5 out pwm
pub static PIN_MODES: [PinModePreset; PIN_MODE_COUNT] = [
    PinModePreset { mode: PinMode::Input, pull: Pull::None },
    PinModePreset { mode: PinMode::Input, pull: Pull::Up },
    PinModePreset { mode: PinMode::Input, pull: Pull::Down },
    PinModePreset { mode: PinMode::OutputPushPull, pull: Pull::None },
    PinModePreset { mode: PinMode::OutputOpenDrain, pull: Pull::None },
    PinModePreset { mode: PinMode::OutputPwm, pull: Pull::None },
];

/// Logical digital pins with an edge interrupt, in line order
pub static EDGE_PINS: [u8; EDGE_LINE_COUNT] = [2, 4, 7, 10];

/// 0 rising, 1 falling, 2 both, 3 disabled
pub static EDGE_MODES: [Option<Edge>; EDGE_MODE_COUNT] =
    [Some(Edge::Rising), Some(Edge::Falling), Some(Edge::Both), None];

/// GPIO for logical digital pin `index`
pub fn pin_mapping(index: usize) -> Result<PhysicalPin, Error> {
    DIGITAL_PINS
        .get(index)
        .map(|m| m.physical)
        .ok_or(Error::InvalidIndex { kind: IndexKind::DigitalPin, index })
}

/// Converter channel for logical analog pin `index`
pub fn analog_mapping(index: usize) -> Result<ChannelId, Error> {
    ANALOG_CHANNELS
        .get(index)
        .map(|m| m.channel)
        .ok_or(Error::InvalidIndex { kind: IndexKind::AnalogPin, index })
}

/// Pin mode preset `index`
pub fn mode_preset(index: usize) -> Result<PinModePreset, Error> {
    PIN_MODES
        .get(index)
        .copied()
        .ok_or(Error::InvalidIndex { kind: IndexKind::PinMode, index })
}

/// Edge line of logical digital pin `index`
pub fn edge_line(index: usize) -> Result<usize, Error> {
    EDGE_PINS
        .iter()
        .position(|&pin| pin as usize == index)
        .ok_or(Error::InvalidIndex { kind: IndexKind::EdgePin, index })
}

/// Edge line wired to `pin`, if any
pub fn edge_line_of(pin: PhysicalPin) -> Option<usize> {
    EDGE_PINS
        .iter()
        .position(|&logical| DIGITAL_PINS[logical as usize].physical == pin)
}

/// Edge mode `index`; `None` disables the interrupt
pub fn edge_mode(index: usize) -> Result<Option<Edge>, Error> {
    EDGE_MODES
        .get(index)
        .copied()
        .ok_or(Error::InvalidIndex { kind: IndexKind::EdgeMode, index })
}

/// Physical board layout, read once from the package-select register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardVariant {
    /// QFN-60 package: single switch, LED1 on the onboard LED
    Compact,
    /// QFN-80 package: all three switches
    #[default]
    Standard,
}

/// LED, switch and analog routing for one board variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPins {
    pub leds: [PhysicalPin; 3],
    /// `None` where the variant has no such switch
    pub switches: [Option<PhysicalPin>; 3],
    /// Analog header pins whose converter channel is bonded out
    pub analog: [bool; ANALOG_PIN_COUNT],
}

impl BoardPins {
    /// Whether analog pin `index` can be converted on this board
    pub fn has_analog(&self, index: usize) -> bool {
        self.analog.get(index).copied().unwrap_or(false)
    }
}

/// RP2350A board, converter inputs 0-3 only
pub static COMPACT_BOARD: BoardPins = BoardPins {
    leds: [PhysicalPin(25), PhysicalPin(16), PhysicalPin(17)],
    switches: [Some(PhysicalPin(22)), None, None],
    analog: [true, true, false, false, false, false],
};

/// RP2350B board
pub static STANDARD_BOARD: BoardPins = BoardPins {
    leds: [PhysicalPin(30), PhysicalPin(16), PhysicalPin(17)],
    switches: [Some(PhysicalPin(31)), Some(PhysicalPin(32)), Some(PhysicalPin(33))],
    analog: [true; ANALOG_PIN_COUNT],
};

impl BoardVariant {
    /// Routing table for this variant
    pub fn pins(self) -> &'static BoardPins {
        match self {
            BoardVariant::Compact => &COMPACT_BOARD,
            BoardVariant::Standard => &STANDARD_BOARD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digital_table_is_ordered_by_logical_index() {
        for (i, m) in DIGITAL_PINS.iter().enumerate() {
            assert_eq!(m.logical as usize, i);
        }
        assert_eq!(pin_mapping(8), Ok(PhysicalPin(8)));
        assert_eq!(pin_mapping(15), Ok(PhysicalPin(15)));
    }

    #[test]
    fn analog_mapping_follows_board_wiring() {
        let channels: [u8; ANALOG_PIN_COUNT] = core::array::from_fn(|i| analog_mapping(i).unwrap().0);
        assert_eq!(channels, [1, 2, 6, 5, 4, 3]);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        assert_eq!(
            pin_mapping(16),
            Err(Error::InvalidIndex { kind: IndexKind::DigitalPin, index: 16 })
        );
        assert_eq!(
            analog_mapping(6),
            Err(Error::InvalidIndex { kind: IndexKind::AnalogPin, index: 6 })
        );
        assert_eq!(
            mode_preset(usize::MAX),
            Err(Error::InvalidIndex { kind: IndexKind::PinMode, index: usize::MAX })
        );
    }

    #[test]
    fn mode_presets_match_index_convention() {
        assert_eq!(mode_preset(1).unwrap(), PinModePreset { mode: PinMode::Input, pull: Pull::Up });
        assert_eq!(mode_preset(2).unwrap().pull, Pull::Down);
        assert_eq!(mode_preset(4).unwrap().mode, PinMode::OutputOpenDrain);
        assert_eq!(mode_preset(5).unwrap().mode, PinMode::OutputPwm);
    }

    #[test]
    fn edge_lines_cover_d2_d4_d7_d10() {
        assert_eq!(edge_line(2), Ok(0));
        assert_eq!(edge_line(10), Ok(3));
        assert_eq!(edge_line(3), Err(Error::InvalidIndex { kind: IndexKind::EdgePin, index: 3 }));
        assert_eq!(edge_line_of(PhysicalPin(7)), Some(2));
        assert_eq!(edge_line_of(PhysicalPin(5)), None);
    }

    #[test]
    fn edge_modes_match_index_convention() {
        assert_eq!(edge_mode(0), Ok(Some(Edge::Rising)));
        assert_eq!(edge_mode(1), Ok(Some(Edge::Falling)));
        assert_eq!(edge_mode(2), Ok(Some(Edge::Both)));
        assert_eq!(edge_mode(3), Ok(None));
        assert_eq!(edge_mode(4), Err(Error::InvalidIndex { kind: IndexKind::EdgeMode, index: 4 }));
    }

    #[test]
    fn compact_board_bonds_out_two_analog_pins() {
        let compact = BoardVariant::Compact.pins();
        assert!(compact.has_analog(0) && compact.has_analog(1));
        assert!((2..ANALOG_PIN_COUNT).all(|i| !compact.has_analog(i)));
        assert!((0..ANALOG_PIN_COUNT).all(|i| BoardVariant::Standard.pins().has_analog(i)));
        assert!(!compact.has_analog(ANALOG_PIN_COUNT));
    }

    #[test]
    fn variants_share_led2_and_led3() {
        let compact = BoardVariant::Compact.pins();
        let standard = BoardVariant::Standard.pins();
        assert_ne!(compact.leds[0], standard.leds[0]);
        assert_eq!(compact.leds[1..], standard.leds[1..]);
        assert!(compact.switches[1].is_none() && compact.switches[2].is_none());
        assert!(standard.switches.iter().all(Option::is_some));
    }
}
