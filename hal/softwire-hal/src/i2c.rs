//! I2C bus abstractions
//!
//! Shared I2C vocabulary (acknowledge bit, address byte, timing config)
//! and a block-level master trait implemented by the software bus.

/// Acknowledge bit driven by the receiver after every byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Ack {
    /// Data line pulled low: byte received
    Ack = 0,
    /// Data line left high: not received, or last byte of a read
    Nack = 1,
}

impl Ack {
    pub const fn is_ack(self) -> bool {
        matches!(self, Ack::Ack)
    }

    pub const fn is_nack(self) -> bool {
        matches!(self, Ack::Nack)
    }
}

/// Transfer direction, the R/W bit of the address byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// 7-bit device address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Create from a 7-bit address (upper bit ignored)
    pub const fn new(addr7: u8) -> Self {
        Self(addr7 & 0x7F)
    }

    /// Create from the 8-bit "base" form datasheets list (R/W bit ignored)
    pub const fn from_base(addr8: u8) -> Self {
        Self(addr8 >> 1)
    }

    /// The 7-bit address
    pub const fn addr7(self) -> u8 {
        self.0
    }

    /// Address byte sent after START
    pub const fn byte(self, direction: Direction) -> u8 {
        (self.0 << 1) | direction as u8
    }

    /// Address byte for a write transfer
    pub const fn write_byte(self) -> u8 {
        self.byte(Direction::Write)
    }

    /// Address byte for a read transfer
    pub const fn read_byte(self) -> u8 {
        self.byte(Direction::Read)
    }
}

/// Block transfers on one bus channel
///
/// Each call is one complete transaction from START to STOP. A NACKed
/// address or data byte aborts the transfer, and the bus is released with
/// STOP before the error comes back, so the next call always begins on an
/// idle bus.
pub trait I2cBus {
    type Error;

    /// Send `data` to `address`
    fn write(&mut self, address: Address, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from `address`, NACKing the final byte
    fn read(&mut self, address: Address, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send `data`, then read into `buf` after a repeated START
    ///
    /// Register-pointer devices take the register index as `data`.
    fn write_read(
        &mut self,
        address: Address,
        data: &[u8],
        buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Software bus timing
///
/// Every clock transition is followed by one settle delay. The default is
/// sized for the slowest device expected on the bus, not for throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Settle time after each line transition in microseconds
    pub settle_us: u32,
    /// Settle units to wait after releasing both lines in bus recovery
    pub recovery_release_units: u32,
    /// Maximum clock pulses while the data line is held low
    pub recovery_pulses: u8,
    /// Polls of a stretched clock line before giving up
    pub stretch_polls: u8,
    /// Wait between stretched clock polls in milliseconds
    pub stretch_poll_ms: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// 5 µs per transition (below 100 kHz), 2 s clock-stretch budget
    pub const STANDARD: Self = Self {
        settle_us: 5,
        recovery_release_units: 400, // 2 ms
        recovery_pulses: 20,         // > 2x9 clocks
        stretch_polls: 20,
        stretch_poll_ms: 100,
    };

    /// Longest time recovery waits on one stretched clock pulse
    pub const fn stretch_budget_ms(&self) -> u32 {
        self.stretch_polls as u32 * self.stretch_poll_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_bytes() {
        let lm92 = Address::from_base(0x90);
        assert_eq!(lm92.addr7(), 0x48);
        assert_eq!(lm92.write_byte(), 0x90);
        assert_eq!(lm92.read_byte(), 0x91);

        // R/W bit of the base form is ignored
        assert_eq!(Address::from_base(0x31), Address::new(0x18));
        assert_eq!(Address::new(0xFF).addr7(), 0x7F);
    }

    #[test]
    fn test_ack_values() {
        assert_eq!(Ack::Ack as u8, 0);
        assert_eq!(Ack::Nack as u8, 1);
        assert!(Ack::Ack.is_ack());
        assert!(Ack::Nack.is_nack());
    }

    #[test]
    fn test_standard_timing() {
        let config = I2cConfig::default();
        assert_eq!(config, I2cConfig::STANDARD);
        assert_eq!(config.settle_us, 5);
        assert_eq!(config.stretch_budget_ms(), 2000);
    }
}
