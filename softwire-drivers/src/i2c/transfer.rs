//! Block transfers on top of the byte primitives
//!
//! Implements both the `softwire-hal` [`I2cBus`] trait and
//! `embedded_hal::i2c::I2c`, so drivers written against either can use the
//! software bus. Every failed transfer ends with STOP.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, NoAcknowledgeSource, Operation};

use softwire_hal::{Ack, Address, BusLines, Direction, I2cBus};

use super::BitBangI2c;

/// I2C transfer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// No device acknowledged the address
    AddressNack,
    /// Device stopped acknowledging data bytes
    DataNack,
}

impl i2c::Error for I2cError {
    fn kind(&self) -> ErrorKind {
        match self {
            I2cError::AddressNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            I2cError::DataNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
        }
    }
}

impl<L: BusLines, D: DelayNs> BitBangI2c<L, D> {
    /// Send START (or repeated START) with an address byte, STOP on NACK
    fn address(&mut self, addr7: u8, direction: Direction, repeated: bool) -> Result<(), I2cError> {
        let byte = Address::new(addr7).byte(direction);
        let ack = if repeated {
            self.repeated_start(byte)
        } else {
            self.start(byte)
        };

        if ack.is_nack() {
            self.stop();
            return Err(I2cError::AddressNack);
        }
        Ok(())
    }
}

/// Whether the read open before `ops[i + 1]` carries on into more data
///
/// Empty reads move no bytes, so they are looked through.
fn read_continues(ops: &[Operation<'_>], i: usize) -> bool {
    ops[i + 1..]
        .iter()
        .find(|op| !matches!(op, Operation::Read(buf) if buf.is_empty()))
        .is_some_and(|op| matches!(op, Operation::Read(_)))
}

impl<L: BusLines, D: DelayNs> i2c::ErrorType for BitBangI2c<L, D> {
    type Error = I2cError;
}

impl<L: BusLines, D: DelayNs> i2c::I2c for BitBangI2c<L, D> {
    /// Adjacent operations of the same kind share one address phase, a
    /// change of kind issues a repeated START. The last byte before a
    /// write or the final STOP is NACKed.
    ///
    /// An empty read that opens the read direction still clocks one byte
    /// with NACK, unless more read data follows. Otherwise the device keeps
    /// driving its first bit and the data line stays low through STOP.
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), I2cError> {
        let mut current: Option<Direction> = None;

        for i in 0..operations.len() {
            let next_is_read = read_continues(operations, i);

            match &mut operations[i] {
                Operation::Write(bytes) => {
                    if current != Some(Direction::Write) {
                        self.address(address, Direction::Write, current.is_some())?;
                        current = Some(Direction::Write);
                    }
                    for &byte in bytes.iter() {
                        if self.write_byte(byte).is_nack() {
                            self.stop();
                            return Err(I2cError::DataNack);
                        }
                    }
                }
                Operation::Read(buf) => {
                    if current != Some(Direction::Read) {
                        self.address(address, Direction::Read, current.is_some())?;
                        current = Some(Direction::Read);
                        if buf.is_empty() && !next_is_read {
                            self.read_byte(Ack::Nack);
                        }
                    }
                    let len = buf.len();
                    for (n, byte) in buf.iter_mut().enumerate() {
                        let last = n + 1 == len && !next_is_read;
                        *byte = self.read_byte(if last { Ack::Nack } else { Ack::Ack });
                    }
                }
            }
        }

        if current.is_some() {
            self.stop();
        }
        Ok(())
    }
}

impl<L: BusLines, D: DelayNs> I2cBus for BitBangI2c<L, D> {
    type Error = I2cError;

    fn write(&mut self, address: Address, data: &[u8]) -> Result<(), I2cError> {
        i2c::I2c::transaction(self, address.addr7(), &mut [Operation::Write(data)])
    }

    fn read(&mut self, address: Address, buf: &mut [u8]) -> Result<(), I2cError> {
        i2c::I2c::transaction(self, address.addr7(), &mut [Operation::Read(buf)])
    }

    fn write_read(
        &mut self,
        address: Address,
        data: &[u8],
        buf: &mut [u8],
    ) -> Result<(), I2cError> {
        i2c::I2c::transaction(
            self,
            address.addr7(),
            &mut [Operation::Write(data), Operation::Read(buf)],
        )
    }
}
