//! Board-support lifecycle
//!
//! [`Bsp::init`] is the single construction point: it builds both arbiters,
//! selects the converter's default channel and owns everything until
//! [`Bsp::release`]. Tasks share the `Bsp` by reference. The two interrupt
//! signals outlive it, since the board's handlers raise them.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::analog::{AnalogPort, CompletionSignal};
use crate::config::{BoardVariant, Config};
use crate::digital::{DigitalPort, EdgeSignals};
use crate::hal::{AnalogConverter, DigitalIo};

/// Digital port and converter of one board
pub struct Bsp<'a, M: RawMutex, IO, C> {
    digital: DigitalPort<'a, M, IO>,
    analog: AnalogPort<'a, M, C>,
}

impl<'a, M: RawMutex, IO: DigitalIo, C: AnalogConverter> Bsp<'a, M, IO, C> {
    /// Bring up board support.
    ///
    /// `done` must be the signal the board's converter interrupt raises,
    /// `edges` the lines its GPIO edge handlers raise.
    /// A converter that rejects its default channel is fatal.
    pub fn init(
        io: IO,
        converter: C,
        done: &'a CompletionSignal<M>,
        edges: &'a EdgeSignals<M>,
        config: Config,
    ) -> Self {
        info!("board support init: {:?} board, wait policy {:?}", config.variant, config.wait);
        Self {
            digital: DigitalPort::new(io, edges, config),
            analog: AnalogPort::new(converter, done, config),
        }
    }

    pub fn digital(&self) -> &DigitalPort<'a, M, IO> {
        &self.digital
    }

    pub fn analog(&self) -> &AnalogPort<'a, M, C> {
        &self.analog
    }

    pub fn variant(&self) -> BoardVariant {
        self.digital.variant()
    }

    /// Tear down board support and hand the drivers back
    pub fn release(self) -> (IO, C) {
        (self.digital.into_inner(), self.analog.into_inner())
    }
}

/// Boolean as an interpreter flag: all bits set for true, zero for false
pub const fn flag(value: bool) -> i32 {
    if value {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    use super::*;
    use crate::digital::{Led, Switch};
    use crate::hal::{Channel, Level};
    use crate::config::WaitPolicy;
    use crate::registry::{ChannelId, Edge, PhysicalPin, COMPACT_BOARD};
    use crate::testing::{ConverterEvent, MockConverter, MockIo};

    type Done = CompletionSignal<CriticalSectionRawMutex>;
    type Edges = EdgeSignals<CriticalSectionRawMutex>;

    #[test]
    fn init_selects_default_channel_and_variant() {
        let done = Done::new();
        let edges = Edges::new();
        let (io, bank) = MockIo::new();
        let (converter, adc) = MockConverter::new();
        let mut config = Config::default();
        config.variant = BoardVariant::Compact;

        let bsp = Bsp::init(io, converter, &done, &edges, config);

        assert_eq!(bsp.variant(), BoardVariant::Compact);
        assert_eq!(adc.events(), [ConverterEvent::Configure(Channel::Input(ChannelId(1)))]);
        block_on(bsp.digital().set_led(Led::Led1, true)).unwrap();
        assert!(bank.lock().unwrap().is_high(COMPACT_BOARD.leds[0].gpio()));
        assert!(!block_on(bsp.digital().switch(Switch::Switch3)).unwrap());
    }

    #[test]
    fn digital_port_is_usable_during_a_conversion() {
        let done = Done::new();
        let edges = Edges::new();
        let (io, _) = MockIo::new();
        let (converter, adc) = MockConverter::new();
        let bsp = Bsp::init(io, converter, &done, &edges, Config::default());

        let (sample, lit) = block_on(join(bsp.analog().read(0), async {
            adc.started().await;
            // converter lock held by the pending read, digital lock is independent
            bsp.digital().set_led(Led::Led2, true).await.unwrap();
            let lit = bsp.digital().led(Led::Led2).await.unwrap();
            done.complete(321);
            lit
        }));

        assert_eq!(sample, Ok(321));
        assert!(lit);
    }

    #[test]
    fn reads_from_several_threads_all_complete() {
        let done = Done::new();
        let edges = Edges::new();
        let (io, _) = MockIo::new();
        let (converter, adc) = MockConverter::new();
        let bsp = Bsp::init(io, converter, &done, &edges, Config::default());
        const READS: usize = 50;

        std::thread::scope(|s| {
            for index in [0, 1] {
                let bsp = &bsp;
                s.spawn(move || {
                    for _ in 0..READS {
                        let sample = block_on(bsp.analog().read(index)).unwrap();
                        assert!(sample <= crate::analog::SAMPLE_MAX);
                    }
                });
            }
            // interrupt stand-in
            let (adc, done) = (&adc, &done);
            s.spawn(move || {
                block_on(async {
                    for n in 0..2 * READS {
                        adc.started().await;
                        done.complete(n as u16);
                    }
                })
            });
        });

        assert!(!adc.overlapped());
    }

    #[test]
    fn edge_wait_does_not_hold_the_port() {
        let done = Done::new();
        let edges = Edges::new();
        let (io, bank) = MockIo::new();
        let (converter, _) = MockConverter::new();
        let bsp = Bsp::init(io, converter, &done, &edges, Config::default());
        block_on(bsp.digital().set_edge_mode(10, 0)).unwrap();
        assert_eq!(bank.lock().unwrap().edges[10], Some(Edge::Rising));

        let (woken, lit) = block_on(join(bsp.digital().wait_edge(10, WaitPolicy::Forever), async {
            bsp.digital().set_led(Led::Led3, true).await.unwrap();
            let lit = bsp.digital().led(Led::Led3).await.unwrap();
            // GPIO edge handler stand-in
            edges.raise(3);
            lit
        }));

        assert_eq!(woken, Ok(()));
        assert!(lit);
    }

    #[test]
    fn release_hands_back_drivers() {
        let done = Done::new();
        let edges = Edges::new();
        let (io, _) = MockIo::new();
        let (converter, adc) = MockConverter::new();
        let bsp = Bsp::init(io, converter, &done, &edges, Config::default());
        block_on(bsp.digital().set_pin(9, true)).unwrap();

        let (mut io, _converter) = bsp.release();
        assert_eq!(io.read(PhysicalPin(9)), Ok(Level::High));
        assert_eq!(adc.events().len(), 1);
    }

    #[test]
    #[should_panic(expected = "default channel configuration")]
    fn init_is_fatal_when_converter_rejects_default_channel() {
        let done = Done::new();
        let edges = Edges::new();
        let (io, _) = MockIo::new();
        let (converter, adc) = MockConverter::new();
        adc.fail_configure(true);
        let _ = Bsp::init(io, converter, &done, &edges, Config::default());
    }

    #[test]
    fn flags_use_all_ones_for_true() {
        assert_eq!(flag(true), -1);
        assert_eq!(flag(false), 0);
    }
}
