//! Hardware configuration types
//!
//! These types describe the bus wiring and the device slots the firmware
//! probes on it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use softwire_hal::channel::CHANNEL_COUNT;
use softwire_hal::Channel;

/// Possible LM92 8-bit base addresses (A1/A0 straps)
pub const LM92_BASES: [u8; 4] = [0x90, 0x92, 0x94, 0x96];

/// Possible DS2482 8-bit base addresses (AD1/AD0 straps)
pub const DS2482_BASES: [u8; 4] = [0x30, 0x32, 0x34, 0x36];

/// Pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self { pin, pull_up: true }
    }
}

/// One wired software bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusChannelConfig {
    /// Clock line
    pub scl: PinConfig,
    /// Data line
    pub sda: PinConfig,
}

/// Board-level bus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Wiring per channel, `None` for unwired channels
    pub channels: [Option<BusChannelConfig>; CHANNEL_COUNT],
    /// Channel the temperature sensor sits on
    pub sensor_channel: Channel,
    /// Sensor read period in milliseconds
    pub sensor_period_ms: u32,
    /// Channel the 1-Wire bridges sit on
    pub bridge_channel: Channel,
    /// Bridge base addresses to probe at startup
    pub bridge_bases: [u8; 4],
    /// Scan and log every channel at startup
    pub scan_on_boot: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            channels: [
                Some(BusChannelConfig {
                    scl: PinConfig::new(4),
                    sda: PinConfig::new(5),
                }),
                None,
                None,
            ],
            sensor_channel: Channel::Ch0,
            sensor_period_ms: 1000,
            bridge_channel: Channel::Ch0,
            bridge_bases: DS2482_BASES,
            scan_on_boot: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A device is assigned to a channel with no wiring
    UnwiredChannel(Channel),
    /// Two lines share one GPIO
    PinConflict(u8),
    /// Sensor period of zero
    InvalidPeriod,
}

impl BoardConfig {
    /// Wiring of one channel
    pub fn channel(&self, channel: Channel) -> Option<&BusChannelConfig> {
        self.channels[channel.index()].as_ref()
    }

    /// Check that devices sit on wired channels and no GPIO is used twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        for ch in [self.sensor_channel, self.bridge_channel] {
            if self.channel(ch).is_none() {
                return Err(ConfigError::UnwiredChannel(ch));
            }
        }

        if self.sensor_period_ms == 0 {
            return Err(ConfigError::InvalidPeriod);
        }

        // Bitmask of used GPIOs, RP2040 has 30
        let mut used: u32 = 0;
        for wiring in self.channels.iter().flatten() {
            for pin in [wiring.scl.pin, wiring.sda.pin] {
                let mask = 1u32 << (pin & 31);
                if used & mask != 0 {
                    return Err(ConfigError::PinConflict(pin));
                }
                used |= mask;
            }
        }

        Ok(())
    }
}
