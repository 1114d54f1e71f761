//! GPIO driver for the digital port
//!
//! Every pin the board exposes is held as a [`Flex`] so it can be switched
//! between input and output at runtime. Open-drain outputs are emulated by
//! driving low or releasing the pin to high impedance.
//!
//! # Edge Lines
//! embassy-rp owns the GPIO bank interrupt, so D2, D4, D7 and D10 each get a
//! second [`Flex`] handed to an edge watcher task. Arming a line from the
//! port only switches the pin to a floating input and sends the edge to its
//! watcher through [`EDGE_ARM`]; the watcher raises [`EDGES`].

use board_support::hal::{DigitalIo, Level, PinError};
use board_support::registry::{
    edge_line_of, BoardVariant, Edge, PhysicalPin, PinMode, PinModePreset, Pull, DIGITAL_PINS,
    EDGE_LINE_COUNT, PIN_MODES,
};
use board_support::EdgeSignals;
use embassy_rp::gpio::{self, Flex};
use embassy_rp::peripherals;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use super::resources::{HeaderResources, LedResources, SwitchResources};

/// GPIO lines on the QFN-80 package
const GPIO_COUNT: usize = 48;

/// LEDs start as push-pull outputs
const LED_PRESET: PinModePreset = PinModePreset {
    mode: PinMode::OutputPushPull,
    pull: Pull::None,
};

/// Switches are active low against the internal pull-up
const SWITCH_PRESET: PinModePreset = PinModePreset {
    mode: PinMode::Input,
    pull: Pull::Up,
};

/// Armed edge lines float
const EDGE_PRESET: PinModePreset = PinModePreset {
    mode: PinMode::Input,
    pull: Pull::None,
};

/// Raised by the edge watchers, awaited by the digital port
pub static EDGES: EdgeSignals<CriticalSectionRawMutex> = EdgeSignals::new();

/// Edge to watch per line, `None` disarms
pub static EDGE_ARM: [Signal<CriticalSectionRawMutex, Option<Edge>>; EDGE_LINE_COUNT] =
    [const { Signal::new() }; EDGE_LINE_COUNT];

/// Watcher-side handles of the edge lines.
///
/// Call before [`RpDigitalIo::new`]: taking a pin resets its pad, and the
/// port driver's setup has to win.
pub fn edge_pins() -> [Flex<'static>; EDGE_LINE_COUNT] {
    // SAFETY: the header group owns these pins too. The watcher only awaits
    // edges on its handle; direction, pull and level stay with RpDigitalIo.
    unsafe {
        [
            Flex::new(peripherals::PIN_2::steal()),
            Flex::new(peripherals::PIN_4::steal()),
            Flex::new(peripherals::PIN_7::steal()),
            Flex::new(peripherals::PIN_10::steal()),
        ]
    }
}

struct Line {
    flex: Flex<'static>,
    mode: PinMode,
}

/// Board GPIO indexed by RP2350 GPIO number
pub struct RpDigitalIo {
    lines: [Option<Line>; GPIO_COUNT],
}

impl RpDigitalIo {
    pub fn new(
        header: HeaderResources,
        leds: LedResources,
        switches: SwitchResources,
        variant: BoardVariant,
    ) -> Self {
        let mut io = Self {
            lines: [const { None }; GPIO_COUNT],
        };

        let header = [
            Flex::new(header.d0),
            Flex::new(header.d1),
            Flex::new(header.d2),
            Flex::new(header.d3),
            Flex::new(header.d4),
            Flex::new(header.d5),
            Flex::new(header.d6),
            Flex::new(header.d7),
            Flex::new(header.d8),
            Flex::new(header.d9),
            Flex::new(header.d10),
            Flex::new(header.d11),
            Flex::new(header.d12),
            Flex::new(header.d13),
            Flex::new(header.d14),
            Flex::new(header.d15),
        ];
        for (mapping, flex) in DIGITAL_PINS.iter().zip(header) {
            io.attach(mapping.physical, flex, PIN_MODES[0]);
        }

        let board = variant.pins();
        let led1 = match variant {
            BoardVariant::Compact => Flex::new(leds.led1_compact),
            BoardVariant::Standard => Flex::new(leds.led1_standard),
        };
        io.attach(board.leds[0], led1, LED_PRESET);
        io.attach(board.leds[1], Flex::new(leds.led2), LED_PRESET);
        io.attach(board.leds[2], Flex::new(leds.led3), LED_PRESET);

        let switches = match variant {
            BoardVariant::Compact => [Some(Flex::new(switches.sw1_compact)), None, None],
            BoardVariant::Standard => [
                Some(Flex::new(switches.sw1_standard)),
                Some(Flex::new(switches.sw2)),
                Some(Flex::new(switches.sw3)),
            ],
        };
        for (pin, flex) in board.switches.iter().zip(switches) {
            if let (Some(pin), Some(flex)) = (pin, flex) {
                io.attach(*pin, flex, SWITCH_PRESET);
            }
        }

        io
    }

    fn attach(&mut self, pin: PhysicalPin, mut flex: Flex<'static>, preset: PinModePreset) {
        apply(&mut flex, preset);
        self.lines[pin.gpio() as usize] = Some(Line {
            flex,
            mode: preset.mode,
        });
    }

    fn line(&mut self, pin: PhysicalPin) -> Result<&mut Line, PinError> {
        self.lines
            .get_mut(pin.gpio() as usize)
            .and_then(Option::as_mut)
            .ok_or(PinError::Unavailable(pin))
    }
}

fn apply(flex: &mut Flex<'static>, preset: PinModePreset) {
    flex.set_pull(match preset.pull {
        Pull::None => gpio::Pull::None,
        Pull::Up => gpio::Pull::Up,
        Pull::Down => gpio::Pull::Down,
    });
    match preset.mode {
        PinMode::Input => flex.set_as_input(),
        // PWM pins are driven as plain outputs
        PinMode::OutputPushPull | PinMode::OutputPwm => flex.set_as_output(),
        PinMode::OutputOpenDrain => {
            flex.set_low();
            flex.set_as_input();
        }
    }
}

impl DigitalIo for RpDigitalIo {
    fn read(&mut self, pin: PhysicalPin) -> Result<Level, PinError> {
        let line = self.line(pin)?;
        Ok(line.flex.is_high().into())
    }

    fn write(&mut self, pin: PhysicalPin, level: Level) -> Result<(), PinError> {
        let line = self.line(pin)?;
        match (line.mode, level) {
            (PinMode::OutputOpenDrain, Level::High) => line.flex.set_as_input(),
            (PinMode::OutputOpenDrain, Level::Low) => {
                line.flex.set_low();
                line.flex.set_as_output();
            }
            (_, Level::High) => line.flex.set_high(),
            (_, Level::Low) => line.flex.set_low(),
        }
        Ok(())
    }

    fn configure(&mut self, pin: PhysicalPin, preset: PinModePreset) -> Result<(), PinError> {
        let line = self.line(pin)?;
        apply(&mut line.flex, preset);
        line.mode = preset.mode;
        Ok(())
    }

    fn configure_edge(&mut self, pin: PhysicalPin, edge: Option<Edge>) -> Result<(), PinError> {
        let index = edge_line_of(pin).ok_or(PinError::Unsupported(pin))?;
        if edge.is_some() {
            self.configure(pin, EDGE_PRESET)?;
        }
        EDGE_ARM[index].signal(edge);
        Ok(())
    }
}
