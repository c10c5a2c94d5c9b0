//! Clock/data line pair of one bus channel
//!
//! [`BusLines`] is the only thing the bit-bang engine knows about hardware.
//! [`PinPair`] implements it for any two [`FlexPin`]s.

use crate::gpio::FlexPin;

/// Which of the two bus lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// SCL
    Clock,
    /// SDA
    Data,
}

/// Line direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Released, pulled high externally unless a device pulls it low
    Input,
    /// Push-pull output driving the latched level
    Output,
}

/// Logic level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level for a single bit (`true` is high)
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Level::High
        } else {
            Level::Low
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

/// The two GPIO lines of one software I2C channel
///
/// `drive` only has an effect on the wire while the line is an output; the
/// level is latched so a later switch to output drives it.
pub trait BusLines {
    /// Switch a line between input and push-pull output
    fn set_mode(&mut self, line: Line, mode: Mode);

    /// Latch a level on a line
    fn drive(&mut self, line: Line, level: Level);

    /// Read the live level of a line
    fn read(&mut self, line: Line) -> Level;
}

/// [`BusLines`] over two independent pins
pub struct PinPair<SCL, SDA> {
    scl: SCL,
    sda: SDA,
}

impl<SCL: FlexPin, SDA: FlexPin> PinPair<SCL, SDA> {
    /// Pair up a clock pin and a data pin
    pub fn new(scl: SCL, sda: SDA) -> Self {
        Self { scl, sda }
    }

    /// Give the pins back
    pub fn release(self) -> (SCL, SDA) {
        (self.scl, self.sda)
    }

    fn pin(&mut self, line: Line) -> &mut dyn FlexPin {
        match line {
            Line::Clock => &mut self.scl,
            Line::Data => &mut self.sda,
        }
    }
}

impl<SCL: FlexPin, SDA: FlexPin> BusLines for PinPair<SCL, SDA> {
    fn set_mode(&mut self, line: Line, mode: Mode) {
        let pin = self.pin(line);
        match mode {
            Mode::Input => pin.set_as_input(),
            Mode::Output => pin.set_as_output(),
        }
    }

    fn drive(&mut self, line: Line, level: Level) {
        self.pin(line).set_state(level.is_high());
    }

    fn read(&mut self, line: Line) -> Level {
        Level::from_bit(self.pin(line).is_high())
    }
}
