//! Board firmware entry point
//!
//! Detects the package variant, brings up board support and spawns the
//! demo tasks and one edge watcher per edge line. The analog monitor runs
//! on an interrupt executor so it preempts the thread-mode blink task.

#![no_std]
#![no_main]

use board_support::{Bsp, Config};
use defmt::info;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::block::ImageDef;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;
use system::adc::{RpConverter, CONVERSION_DONE};
use system::gpio::{self, RpDigitalIo, EDGES};
use system::resources::{
    self, AnalogResources, AssignedResources, HeaderResources, LedResources, SwitchResources,
};
use task::{analog_monitor::analog_monitor, blink::blink, edge_watch::edge_watch};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// System core modules
mod system;
/// Task implementations
mod task;

/// Board support as shared by every task
pub type BoardSupport = Bsp<'static, CriticalSectionRawMutex, RpDigitalIo, RpConverter>;

static BOARD_SUPPORT: StaticCell<BoardSupport> = StaticCell::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let variant = resources::detect_variant();
    info!("running on {} board", variant);

    let r = split_resources!(p);
    let edge_pins = gpio::edge_pins();
    let io = RpDigitalIo::new(r.header, r.leds, r.switches, variant);
    let converter = RpConverter::new(r.analog.adc, variant);

    let config = Config {
        variant,
        ..Config::default()
    };
    let bsp: &'static BoardSupport =
        BOARD_SUPPORT.init(Bsp::init(io, converter, &CONVERSION_DONE, &EDGES, config));

    // below the ADC interrupt, above thread mode
    interrupt::SWI_IRQ_1.set_priority(Priority::P3);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high.spawn(analog_monitor(bsp).unwrap());

    for (line, pin) in edge_pins.into_iter().enumerate() {
        spawner.spawn(edge_watch(line, pin).unwrap());
    }
    spawner.spawn(blink(bsp).unwrap());
}
