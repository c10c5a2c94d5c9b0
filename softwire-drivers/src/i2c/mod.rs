//! Bit-banged I2C master
//!
//! Drives a clock/data line pair through [`BusLines`] and produces START,
//! repeated START, STOP, byte write and byte read. Every clock transition
//! is followed by one settle delay; data transitions are not.
//!
//! Lines are open-drain by convention: a released (input) line is pulled
//! high externally, and the master only actively drives data or clock while
//! it owns the bus. Bus recovery never drives the clock high.

mod recovery;
#[cfg(test)]
pub(crate) mod sim;
mod transfer;

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use softwire_hal::{Ack, BusLines, I2cConfig, Level, Line, Mode};

pub use recovery::RecoveryError;
pub use transfer::I2cError;

/// Lowest and highest 8-bit write addresses probed by [`BitBangI2c::scan`]
///
/// 0x00 is the general call address and is never probed.
pub const SCAN_FIRST: u8 = 0x02;
pub const SCAN_LAST: u8 = 0xFE;

/// Number of addresses one scan probes, so every one of them fits
pub const SCAN_CAPACITY: usize = ((SCAN_LAST - SCAN_FIRST) / 2 + 1) as usize;

/// Software I2C master on one line pair
pub struct BitBangI2c<L, D> {
    lines: L,
    delay: D,
    config: I2cConfig,
}

impl<L: BusLines, D: DelayNs> BitBangI2c<L, D> {
    /// Create a master with standard timing
    pub fn new(lines: L, delay: D) -> Self {
        Self::with_config(lines, delay, I2cConfig::STANDARD)
    }

    /// Create a master with custom timing
    pub fn with_config(lines: L, delay: D, config: I2cConfig) -> Self {
        Self {
            lines,
            delay,
            config,
        }
    }

    pub fn config(&self) -> &I2cConfig {
        &self.config
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Give the line pair and delay back
    pub fn free(self) -> (L, D) {
        (self.lines, self.delay)
    }

    /// Put both lines into the idle state: latched high, then outputs
    pub fn init(&mut self) {
        self.sda(Level::High);
        self.scl(Level::High);
        self.lines.set_mode(Line::Clock, Mode::Output);
        self.lines.set_mode(Line::Data, Mode::Output);
    }

    /// Generate START and send the address byte
    ///
    /// Expects the data line high. Returns the acknowledge of the address.
    pub fn start(&mut self, address: u8) -> Ack {
        self.scl(Level::High);
        self.sda(Level::Low);
        self.settle(1);
        self.scl(Level::Low);
        self.write_byte(address)
    }

    /// Generate a repeated START without a STOP in between
    ///
    /// Expects the clock low. The data line is raised first so the START
    /// edge happens with the clock high.
    pub fn repeated_start(&mut self, address: u8) -> Ack {
        self.sda(Level::High);
        self.settle(1);
        self.start(address)
    }

    /// Generate STOP
    ///
    /// Expects the data line low. Leaves both lines high.
    pub fn stop(&mut self) {
        self.scl(Level::High);
        self.sda(Level::High);
        self.settle(1);
    }

    /// Clock out one byte MSB first and sample the acknowledge
    ///
    /// Leaves the clock low and the data line driven low.
    pub fn write_byte(&mut self, byte: u8) -> Ack {
        self.scl(Level::Low);
        for bit in (0..8).rev() {
            self.sda(Level::from_bit(byte & (1 << bit) != 0));
            self.scl(Level::High);
            self.scl(Level::Low);
        }

        // Acknowledge clock, the slave owns the data line
        self.lines.set_mode(Line::Data, Mode::Input);
        self.settle(1);
        self.scl(Level::High);
        let ack = match self.lines.read(Line::Data) {
            Level::Low => Ack::Ack,
            Level::High => Ack::Nack,
        };
        self.scl(Level::Low);
        self.lines.set_mode(Line::Data, Mode::Output);
        self.sda(Level::Low);

        ack
    }

    /// Clock in one byte MSB first and answer with `ack`
    ///
    /// Use [`Ack::Nack`] on the last byte of a read. Leaves the clock low
    /// and the data line driven low.
    pub fn read_byte(&mut self, ack: Ack) -> u8 {
        self.scl(Level::Low);
        self.lines.set_mode(Line::Data, Mode::Input);

        let mut byte = 0u8;
        for _ in 0..8 {
            byte <<= 1;
            self.scl(Level::High);
            if self.lines.read(Line::Data).is_high() {
                byte |= 1;
            }
            self.scl(Level::Low);
        }

        self.lines.set_mode(Line::Data, Mode::Output);
        self.sda(Level::from_bit(ack.is_nack()));
        self.scl(Level::High);
        self.scl(Level::Low);
        self.sda(Level::Low);

        byte
    }

    /// Probe every even write address from 0x02 to 0xFE
    ///
    /// Each probe is a START with the address byte followed by a STOP.
    /// Returns the 8-bit write addresses that acknowledged.
    pub fn scan(&mut self) -> Vec<u8, SCAN_CAPACITY> {
        let mut found = Vec::new();

        for address in (SCAN_FIRST..=SCAN_LAST).step_by(2) {
            let ack = self.start(address);
            self.stop();
            if ack.is_ack() && found.push(address).is_err() {
                break;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("I2C scan: {} device(s)", found.len());

        found
    }

    /// Drive the clock and wait one settle unit
    fn scl(&mut self, level: Level) {
        self.lines.drive(Line::Clock, level);
        self.settle(1);
    }

    fn sda(&mut self, level: Level) {
        self.lines.drive(Line::Data, level);
    }

    fn settle(&mut self, units: u32) {
        self.delay.delay_us(self.config.settle_us * units);
    }
}
