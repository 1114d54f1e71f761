//! Recording drivers for host tests
//!
//! Both mocks keep their state behind an `Arc<Mutex<..>>` so a test can
//! inspect or poke the "hardware" while the arbiter owns the driver.

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use embassy_futures::yield_now;

use crate::hal::{AnalogConverter, Channel, ConverterError, DigitalIo, Level, PinError};
use crate::registry::{Edge, PhysicalPin, PinModePreset};

/// GPIO lines on the larger package
pub const GPIO_COUNT: usize = 48;

/// Electrical state of every GPIO plus failure injection
pub struct PinBank {
    pub levels: [bool; GPIO_COUNT],
    pub presets: [Option<PinModePreset>; GPIO_COUNT],
    /// Armed edge per GPIO
    pub edges: [Option<Edge>; GPIO_COUNT],
    /// GPIOs whose reads and writes fail
    pub unavailable: Vec<u8>,
    pub fail_configure: bool,
    /// Driver calls of any kind
    pub accesses: usize,
}

impl PinBank {
    fn new() -> Self {
        Self {
            levels: [false; GPIO_COUNT],
            presets: [None; GPIO_COUNT],
            edges: [None; GPIO_COUNT],
            unavailable: Vec::new(),
            fail_configure: false,
            accesses: 0,
        }
    }

    pub fn set(&mut self, gpio: u8, high: bool) {
        self.levels[gpio as usize] = high;
    }

    pub fn is_high(&self, gpio: u8) -> bool {
        self.levels[gpio as usize]
    }

    fn check(&mut self, pin: PhysicalPin) -> Result<usize, PinError> {
        self.accesses += 1;
        if self.unavailable.contains(&pin.0) || pin.0 as usize >= GPIO_COUNT {
            return Err(PinError::Unavailable(pin));
        }
        Ok(pin.0 as usize)
    }
}

pub struct MockIo {
    bank: Arc<Mutex<PinBank>>,
    yield_on_write: bool,
}

impl MockIo {
    pub fn new() -> (Self, Arc<Mutex<PinBank>>) {
        let bank = Arc::new(Mutex::new(PinBank::new()));
        (
            Self {
                bank: bank.clone(),
                yield_on_write: false,
            },
            bank,
        )
    }

    /// Give up the OS time slice after every write, widening any race window
    pub fn yielding(mut self) -> Self {
        self.yield_on_write = true;
        self
    }
}

impl DigitalIo for MockIo {
    fn read(&mut self, pin: PhysicalPin) -> Result<Level, PinError> {
        let mut bank = self.bank.lock().unwrap();
        let i = bank.check(pin)?;
        Ok(bank.levels[i].into())
    }

    fn write(&mut self, pin: PhysicalPin, level: Level) -> Result<(), PinError> {
        {
            let mut bank = self.bank.lock().unwrap();
            let i = bank.check(pin)?;
            bank.levels[i] = level.into();
        }
        if self.yield_on_write {
            std::thread::yield_now();
        }
        Ok(())
    }

    fn configure(&mut self, pin: PhysicalPin, preset: PinModePreset) -> Result<(), PinError> {
        let mut bank = self.bank.lock().unwrap();
        let i = bank.check(pin)?;
        if bank.fail_configure {
            return Err(PinError::Unsupported(pin));
        }
        bank.presets[i] = Some(preset);
        Ok(())
    }

    fn configure_edge(&mut self, pin: PhysicalPin, edge: Option<Edge>) -> Result<(), PinError> {
        let mut bank = self.bank.lock().unwrap();
        let i = bank.check(pin)?;
        if bank.fail_configure {
            return Err(PinError::Unsupported(pin));
        }
        bank.edges[i] = edge;
        Ok(())
    }
}

/// Register-level calls seen by the mock converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterEvent {
    Configure(Channel),
    Start,
    Stop,
}

#[derive(Default)]
struct ConverterLog {
    events: Vec<ConverterEvent>,
    selected: Option<Channel>,
    /// Started and not yet picked up by the interrupt stand-in
    pending: Option<Channel>,
    running: bool,
    /// Set if a conversion was started or reconfigured while another was running
    overlapped: bool,
    fail_configure: bool,
    fail_start: bool,
}

pub struct MockConverter {
    log: Arc<Mutex<ConverterLog>>,
}

/// Test-side handle: failure injection and the interrupt stand-in
pub struct ConverterHandle {
    log: Arc<Mutex<ConverterLog>>,
}

impl MockConverter {
    pub fn new() -> (Self, ConverterHandle) {
        let log = Arc::new(Mutex::new(ConverterLog::default()));
        (Self { log: log.clone() }, ConverterHandle { log })
    }
}

impl AnalogConverter for MockConverter {
    fn configure_channel(&mut self, channel: Channel) -> Result<(), ConverterError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_configure {
            return Err(ConverterError::ChannelUnavailable(channel));
        }
        log.overlapped |= log.running;
        log.events.push(ConverterEvent::Configure(channel));
        log.selected = Some(channel);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ConverterError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_start {
            return Err(ConverterError::NotReady);
        }
        log.overlapped |= log.running;
        log.events.push(ConverterEvent::Start);
        log.running = true;
        log.pending = log.selected;
        Ok(())
    }

    fn stop(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.events.push(ConverterEvent::Stop);
        log.running = false;
        log.pending = None;
    }
}

impl ConverterHandle {
    /// Wait until a conversion has been started, as the end-of-conversion
    /// interrupt would, and return its channel
    pub async fn started(&self) -> Channel {
        loop {
            if let Some(channel) = self.log.lock().unwrap().pending.take() {
                return channel;
            }
            yield_now().await;
        }
    }

    pub fn events(&self) -> Vec<ConverterEvent> {
        self.log.lock().unwrap().events.clone()
    }

    pub fn overlapped(&self) -> bool {
        self.log.lock().unwrap().overlapped
    }

    pub fn is_running(&self) -> bool {
        self.log.lock().unwrap().running
    }

    pub fn fail_configure(&self, fail: bool) {
        self.log.lock().unwrap().fail_configure = fail;
    }

    pub fn fail_start(&self, fail: bool) {
        self.log.lock().unwrap().fail_start = fail;
    }
}
