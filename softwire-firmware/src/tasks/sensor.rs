//! Temperature sensor task
//!
//! Owns the bus the LM92 sits on. Reads once per period and publishes the
//! result; a failed read triggers bus recovery before the next attempt.

use defmt::*;
use embassy_time::{Duration, Ticker};

use softwire_drivers::sensor::Lm92;

use crate::channels::TEMP_READING;
use crate::Bus;

/// Sensor task configuration
#[derive(Clone, Copy)]
pub struct SensorTaskConfig {
    /// Read period in milliseconds
    pub period_ms: u32,
    /// Consecutive failed reads before each bus recovery attempt
    pub recover_after: u8,
}

impl Default for SensorTaskConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            recover_after: 1,
        }
    }
}

#[embassy_executor::task]
pub async fn sensor_task(mut bus: Bus, config: SensorTaskConfig) {
    info!("Sensor task started ({}ms period)", config.period_ms);

    let mut lm92 = Lm92::new();
    let mut failures: u8 = 0;
    let mut ticker = Ticker::every(Duration::from_millis(config.period_ms as u64));

    loop {
        ticker.next().await;

        match lm92.read(&mut bus) {
            Ok(temp) => {
                if failures > 0 {
                    info!("LM92 answering again at {}", lm92.address());
                }
                failures = 0;
                trace!("LM92 raw {=i16}", temp.raw());
                TEMP_READING.signal(Some(temp.to_celsius_x10()));
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                warn!("LM92 read failed: {} ({} in a row)", e, failures);
                TEMP_READING.signal(None);

                if failures >= config.recover_after {
                    match bus.reset_bus() {
                        Ok(()) => info!("Sensor bus recovered"),
                        Err(e) => error!("Sensor bus recovery failed: {} (code {})", e, e.code()),
                    }
                }
            }
        }
    }
}
