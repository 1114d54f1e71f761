//! LED1 blink
//!
//! Toggles LED1 until SW1 is pressed, then leaves it off. Runs on the
//! thread-mode executor and competes with the analog monitor only for the
//! digital port lock.

use board_support::{Led, Switch};
use defmt::{error, info, warn};
use embassy_time::{Duration, Timer};

use crate::BoardSupport;

/// Half period of the blink
const BLINK_INTERVAL: Duration = Duration::from_millis(200);

/// Blinks LED1 until SW1 reads pressed
#[embassy_executor::task]
pub async fn blink(bsp: &'static BoardSupport) {
    let digital = bsp.digital();
    info!("LED1 blinking until SW1 is pressed");

    let mut lit = false;
    loop {
        match digital.switch(Switch::Switch1).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => {
                error!("SW1 read failed: {}", e);
                break;
            }
        }

        lit = !lit;
        if let Err(e) = digital.set_led(Led::Led1, lit).await {
            warn!("LED1 write failed: {}", e);
        }
        Timer::after(BLINK_INTERVAL).await;
    }

    if let Err(e) = digital.set_led(Led::Led1, false).await {
        warn!("LED1 write failed: {}", e);
    }
    info!("SW1 pressed, LED1 off");
}
