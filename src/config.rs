//! Board-support configuration
//!
//! Built like the embassy HAL configs: start from `Config::default()` and
//! assign the fields that differ.
//!
//! ```rust,ignore
//! let mut config = Config::default();
//! config.variant = BoardVariant::Compact;
//! config.wait = WaitPolicy::Bounded(Duration::from_millis(50));
//! ```

use core::future::Future;

use embassy_time::{with_timeout, Duration};

use crate::error::Error;
pub use crate::registry::BoardVariant;

/// How long lock acquisition and conversion completion may block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPolicy {
    /// Block until the resource is available. A wedged peripheral blocks
    /// every later caller.
    #[default]
    Forever,
    /// Give up with [`Error::Timeout`] after the given duration
    Bounded(Duration),
}

impl WaitPolicy {
    /// Await `fut` under this policy
    pub(crate) async fn wait<F: Future>(self, fut: F) -> Result<F::Output, Error> {
        match self {
            WaitPolicy::Forever => Ok(fut.await),
            WaitPolicy::Bounded(limit) => with_timeout(limit, fut).await.map_err(|_| Error::Timeout),
        }
    }
}

/// Constants for converting raw samples of the internal channels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogConfig {
    /// Converter reference voltage in millivolts
    pub reference_mv: u32,
    /// Divider ratio between the supply rail and the supply channel
    pub supply_divider: u32,
    /// Temperature sensor output at 27 °C, in millivolts
    pub sensor_mv_at_27c: f32,
    /// Temperature sensor slope in millivolts per °C (sensor falls with temperature)
    pub sensor_mv_per_c: f32,
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            reference_mv: 3300,
            supply_divider: 3,
            sensor_mv_at_27c: 706.0,
            sensor_mv_per_c: 1.721,
        }
    }
}

/// Board-support configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Board layout; resolved once by the caller before `Bsp::init`
    pub variant: BoardVariant,
    /// Applied to both locks and to the conversion wait
    pub wait: WaitPolicy,
    pub analog: AnalogConfig,
}
