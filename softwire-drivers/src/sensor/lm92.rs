//! LM92 12-bit plus sign temperature sensor
//!
//! The temperature register is the power-on default pointer, so a read is
//! just the read address followed by two bytes. The sensor can sit on any
//! of four strapped addresses; every read probes them in ascending order.
//!
//! Register layout (MSB first): sign, 12 bits of temperature at
//! 0.0625°C, then three status bits that are masked off. Masked, the
//! register is a two's complement Q8.7 value.

use embedded_hal::delay::DelayNs;

use softwire_core::config::LM92_BASES;
use softwire_core::{SensorError, TemperatureSensor, Q7};
use softwire_hal::{Ack, Address, BusLines};

use crate::i2c::BitBangI2c;

/// Status bits in the low byte (T_LOW, T_HIGH, T_CRIT)
const STATUS_MASK: u16 = 0x0007;
const SIGN_BIT: u16 = 0x8000;
const FULL_SCALE: i32 = 0x8000;

/// Convert the raw temperature register to Q8.7
///
/// The three status bits are cleared. A negative value has its sign bit
/// cleared and is taken as the negated distance from full scale.
pub fn decode(msb: u8, lsb: u8) -> Q7 {
    let raw = u16::from_be_bytes([msb, lsb]) & !STATUS_MASK;

    if raw & SIGN_BIT == 0 {
        return Q7::from_raw(raw as i16);
    }

    // Magnitude is 8..=32768, so the negation always fits
    let magnitude = FULL_SCALE - i32::from(raw & !SIGN_BIT);
    Q7::from_raw((-magnitude) as i16)
}

/// LM92 on the software bus
///
/// Holds no bus handle; every operation borrows the bus so several devices
/// can share one channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lm92 {
    found: Option<Address>,
}

impl Lm92 {
    pub const fn new() -> Self {
        Self { found: None }
    }

    /// Address that answered the most recent read
    pub fn address(&self) -> Option<Address> {
        self.found
    }

    /// Read the temperature
    ///
    /// Tries each strapped read address from the lowest. A NACKed address
    /// is closed with STOP before the next one is tried.
    pub fn read<L: BusLines, D: DelayNs>(
        &mut self,
        bus: &mut BitBangI2c<L, D>,
    ) -> Result<Q7, SensorError> {
        let Some(address) = self.locate(bus) else {
            self.found = None;
            #[cfg(feature = "defmt")]
            defmt::debug!("LM92: no response on any address");
            return Err(SensorError::NotFound);
        };
        self.found = Some(address);

        let msb = bus.read_byte(Ack::Ack);
        let lsb = bus.read_byte(Ack::Nack);
        bus.stop();

        Ok(decode(msb, lsb))
    }

    /// Read the temperature, zero when no sensor answers
    ///
    /// The flag is `true` when a sensor answered.
    pub fn read_or_zero<L: BusLines, D: DelayNs>(
        &mut self,
        bus: &mut BitBangI2c<L, D>,
    ) -> (Q7, bool) {
        match self.read(bus) {
            Ok(temp) => (temp, true),
            Err(_) => (Q7::ZERO, false),
        }
    }

    /// START each read address until one acknowledges
    ///
    /// Leaves the bus addressed on success.
    fn locate<L: BusLines, D: DelayNs>(&self, bus: &mut BitBangI2c<L, D>) -> Option<Address> {
        for base in LM92_BASES {
            let address = Address::from_base(base);
            if bus.start(address.read_byte()).is_ack() {
                return Some(address);
            }
            bus.stop();
        }
        None
    }
}

/// [`TemperatureSensor`] for an LM92 bound to one bus
pub struct Lm92Sensor<'a, L, D> {
    bus: &'a mut BitBangI2c<L, D>,
    lm92: Lm92,
}

impl<'a, L: BusLines, D: DelayNs> Lm92Sensor<'a, L, D> {
    pub fn new(bus: &'a mut BitBangI2c<L, D>) -> Self {
        Self {
            bus,
            lm92: Lm92::new(),
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.lm92.address()
    }
}

impl<L: BusLines, D: DelayNs> TemperatureSensor for Lm92Sensor<'_, L, D> {
    fn read_q7(&mut self) -> Result<Q7, SensorError> {
        self.lm92.read(self.bus)
    }
}
