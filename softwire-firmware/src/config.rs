//! Board configuration
//!
//! The board layout is compiled in. It is validated once at startup before
//! any pin is touched.

use defmt::*;

use softwire_core::config::BoardConfig;

/// Load and validate the board configuration
///
/// An invalid layout is a build error in practice, so it halts here.
pub fn load() -> BoardConfig {
    let config = BoardConfig::default();

    if let Err(e) = config.validate() {
        panic!("Invalid board configuration: {}", e);
    }

    for channel in softwire_hal::Channel::ALL {
        if let Some(wiring) = config.channel(channel) {
            info!(
                "{}: SCL GPIO{} SDA GPIO{}",
                channel, wiring.scl.pin, wiring.sda.pin
            );
        }
    }
    info!(
        "Sensor on {} every {}ms, bridges on {}",
        config.sensor_channel, config.sensor_period_ms, config.bridge_channel
    );

    config
}
