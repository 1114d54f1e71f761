//! Analog monitoring
//!
//! Periodically samples the supply rail, the die temperature and the analog
//! header through the shared analog port.
//!
//! # Measurement Strategy
//! - Samples every 2 seconds after a 500ms settling delay
//! - Median filters supply and temperature over 9 samples
//! - Reads A0-A5 raw, A0-A1 only on the QFN-60 board
//!
//! # Voltage Calculations
//! ```text
//! Supply (mV) = ADC Value * 3300 * 3 / 4096
//! Temperature (C) = 27 - (ADC Value * 3300 / 4096 - 706) / 1.721
//! ```
//!
//! Runs on the interrupt executor, so it preempts the blink task whenever a
//! sample is due. The analog port lock is only held across one conversion.

use board_support::registry::ANALOG_PIN_COUNT;
use defmt::{debug, info, warn};
use embassy_time::{Duration, Timer};
use moving_median::MovingMedian;

use crate::BoardSupport;

/// Time between samples
const MEASUREMENT_INTERVAL: Duration = Duration::from_secs(2);

/// Settling time before the first sample
const INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Median filter window
const MEDIAN_WINDOW_SIZE: usize = 9;

/// Monitoring loop, one sample set per interval
#[embassy_executor::task]
pub async fn analog_monitor(bsp: &'static BoardSupport) {
    let analog = bsp.analog();
    let board = bsp.variant().pins();

    let mut supply_median = MovingMedian::<f32, MEDIAN_WINDOW_SIZE>::new();
    let mut temperature_median = MovingMedian::<f32, MEDIAN_WINDOW_SIZE>::new();

    Timer::after(INITIAL_DELAY).await;

    loop {
        match analog.read_supply_mv().await {
            Ok(mv) => {
                supply_median.add_value(mv as f32);
                info!("supply {} mV", supply_median.median() as u32);
            }
            Err(e) => warn!("supply read failed: {}", e),
        }
        match analog.read_temperature().await {
            Ok(celsius) => {
                temperature_median.add_value(celsius);
                info!("die temperature {} C", temperature_median.median());
            }
            Err(e) => warn!("temperature read failed: {}", e),
        }

        let mut samples = [None; ANALOG_PIN_COUNT];
        for (index, sample) in samples.iter_mut().enumerate() {
            if !board.has_analog(index) {
                continue;
            }
            match analog.read(index).await {
                Ok(raw) => *sample = Some(raw),
                Err(e) => warn!("A{} read failed: {}", index, e),
            }
        }
        debug!("analog header: {}", samples);

        Timer::after(MEASUREMENT_INTERVAL).await;
    }
}
