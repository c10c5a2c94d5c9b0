//! DS2482-100 I2C to 1-Wire bridge
//!
//! Only the bridge housekeeping and the search primitive are driven from
//! here: device reset, configuration write with read-back, and the
//! 1-Wire triplet used by ROM search. The bridge shares the software bus
//! with other devices, so every operation borrows the bus.

use bitflags::bitflags;
use embedded_hal::delay::DelayNs;

use softwire_hal::{Ack, Address, BusLines};

use crate::i2c::BitBangI2c;

/// Bridge command bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    OneWireTriplet = 0x78,
    OneWireSingleBit = 0x87,
    OneWireReadByte = 0x96,
    OneWireWriteByte = 0xA5,
    OneWireReset = 0xB4,
    ChannelSelect = 0xC3,
    WriteConfiguration = 0xD2,
    SetReadPointer = 0xE1,
    DeviceReset = 0xF0,
}

bitflags! {
    /// Status register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// 1-Wire busy
        const BUSY = 0x01;
        /// Presence pulse detected
        const PRESENCE = 0x02;
        /// Short detected
        const SHORT = 0x04;
        /// Logic level of the 1-Wire line
        const LOGIC_LEVEL = 0x08;
        /// Device reset has occurred
        const DEVICE_RESET = 0x10;
        /// Single bit result
        const SINGLE_BIT = 0x20;
        /// Triplet second bit
        const TRIPLET_SECOND = 0x40;
        /// Branch direction taken
        const DIRECTION = 0x80;
    }
}

bitflags! {
    /// Configuration register, low nibble
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Config: u8 {
        /// Active pull-up
        const ACTIVE_PULLUP = 0x01;
        /// Strong pull-up
        const STRONG_PULLUP = 0x04;
        /// Overdrive speed
        const ONEWIRE_SPEED = 0x08;
    }
}

impl Config {
    /// Byte written with the configuration command
    ///
    /// The high nibble must be the one's complement of the low nibble.
    pub const fn wire_byte(self) -> u8 {
        (self.bits() & 0x0F) | ((!self.bits() & 0x0F) << 4)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status({=u8:#04x})", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Config {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Config({=u8:#04x})", self.bits())
    }
}

/// Configuration used by [`Ds2482::write_config`]: active pull-up only
pub const DEFAULT_CONFIG: Config = Config::ACTIVE_PULLUP;

/// Status reads while waiting for a triplet to complete
pub const POLL_LIMIT: u16 = 200;

/// Status after device reset, logic level ignored
const RESET_MASK: u8 = !Status::LOGIC_LEVEL.bits();
const RESET_STATUS: u8 = Status::DEVICE_RESET.bits();

/// Bridge errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeError {
    /// Bridge did not acknowledge its address or a command byte
    Nack,
    /// 1-Wire busy never cleared; the bridge has been reset
    PollLimit,
}

/// One DS2482 at a fixed address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ds2482 {
    address: Address,
}

impl Ds2482 {
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    /// Bridge at an 8-bit base address (0x30, 0x32, 0x34 or 0x36)
    pub const fn from_base(base: u8) -> Self {
        Self::new(Address::from_base(base))
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    /// Reset the bridge and check the reset status
    ///
    /// Returns `true` when the status reads back as "device reset" with
    /// every other bit clear except the line level.
    pub fn reset<L: BusLines, D: DelayNs>(&self, bus: &mut BitBangI2c<L, D>) -> bool {
        let status = self
            .command(bus, &[Command::DeviceReset as u8])
            .and_then(|()| self.read_one(bus));

        match status {
            Ok(status) => status & RESET_MASK == RESET_STATUS,
            Err(_) => false,
        }
    }

    /// Write the configuration register and verify the read-back
    ///
    /// On mismatch or NACK the bridge is reset once and `false` returned.
    pub fn write_config<L: BusLines, D: DelayNs>(&self, bus: &mut BitBangI2c<L, D>) -> bool {
        let expected = DEFAULT_CONFIG.wire_byte();
        let read_back = self
            .command(bus, &[Command::WriteConfiguration as u8, expected])
            .and_then(|()| self.read_one(bus));

        match read_back {
            Ok(byte) if byte == expected => true,
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("DS2482 {=u8:#04x}: config read-back mismatch", self.address.addr7());
                self.reset(bus);
                false
            }
        }
    }

    /// Reset, then configure
    pub fn detect<L: BusLines, D: DelayNs>(&self, bus: &mut BitBangI2c<L, D>) -> bool {
        self.reset(bus) && self.write_config(bus)
    }

    /// Run one 1-Wire search triplet
    ///
    /// `direction` is the branch to take when both bit values are present.
    /// Status is polled with acknowledged reads until 1-Wire busy clears,
    /// then read once more with NACK to end the transfer; that final
    /// status is returned. When busy never clears within [`POLL_LIMIT`]
    /// polls the bridge is reset.
    pub fn search_triplet<L: BusLines, D: DelayNs>(
        &self,
        bus: &mut BitBangI2c<L, D>,
        direction: bool,
    ) -> Result<Status, BridgeError> {
        let direction_byte = if direction { Status::DIRECTION.bits() } else { 0 };
        self.command(bus, &[Command::OneWireTriplet as u8, direction_byte])?;

        if bus.repeated_start(self.address.read_byte()).is_nack() {
            bus.stop();
            return Err(BridgeError::Nack);
        }

        let mut status = Status::from_bits_retain(bus.read_byte(Ack::Ack));
        let mut polls = 0;
        while status.contains(Status::BUSY) && polls < POLL_LIMIT {
            status = Status::from_bits_retain(bus.read_byte(Ack::Ack));
            polls += 1;
        }

        let last = Status::from_bits_retain(bus.read_byte(Ack::Nack));
        bus.stop();

        if status.contains(Status::BUSY) {
            #[cfg(feature = "defmt")]
            defmt::warn!("DS2482 {=u8:#04x}: triplet busy after {} polls", self.address.addr7(), polls);
            self.reset(bus);
            return Err(BridgeError::PollLimit);
        }

        Ok(last)
    }

    /// Address for write and send command bytes, STOP on any NACK
    ///
    /// Leaves the bus open for a repeated START.
    fn command<L: BusLines, D: DelayNs>(
        &self,
        bus: &mut BitBangI2c<L, D>,
        bytes: &[u8],
    ) -> Result<(), BridgeError> {
        if bus.start(self.address.write_byte()).is_nack() {
            bus.stop();
            return Err(BridgeError::Nack);
        }
        for &byte in bytes {
            if bus.write_byte(byte).is_nack() {
                bus.stop();
                return Err(BridgeError::Nack);
            }
        }
        Ok(())
    }

    /// Repeated START for read, one NACKed byte, STOP
    fn read_one<L: BusLines, D: DelayNs>(
        &self,
        bus: &mut BitBangI2c<L, D>,
    ) -> Result<u8, BridgeError> {
        if bus.repeated_start(self.address.read_byte()).is_nack() {
            bus.stop();
            return Err(BridgeError::Nack);
        }
        let byte = bus.read_byte(Ack::Nack);
        bus.stop();
        Ok(byte)
    }
}

impl Status {
    /// First bit read in a triplet (id bit)
    pub fn id_bit(self) -> bool {
        self.contains(Status::SINGLE_BIT)
    }

    /// Second bit read in a triplet (complement bit)
    pub fn complement_bit(self) -> bool {
        self.contains(Status::TRIPLET_SECOND)
    }

    /// Branch the bridge took
    pub fn direction(self) -> bool {
        self.contains(Status::DIRECTION)
    }

    /// No device answered this bit position
    pub fn no_devices(self) -> bool {
        self.id_bit() && self.complement_bit()
    }
}
