//! Pin lookup by GPIO number
//!
//! Bus wiring comes from configuration as GPIO numbers, so pins are moved
//! into a [`PinBank`] once and taken out by number when a channel is bound.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Move every GPIO out of the peripherals into a [`PinBank`]
///
/// ```ignore
/// let p = embassy_rp::init(Default::default());
/// let mut bank = pin_bank!(p);
/// let scl = bank.take(4)?;
/// ```
#[macro_export]
macro_rules! pin_bank {
    (@any $pin:expr) => {
        embassy_rp::Peri::<'static, embassy_rp::gpio::AnyPin>::from($pin)
    };
    ($p:expr) => {
        $crate::pins::PinBank::new([
            $crate::pin_bank!(@any $p.PIN_0), $crate::pin_bank!(@any $p.PIN_1),
            $crate::pin_bank!(@any $p.PIN_2), $crate::pin_bank!(@any $p.PIN_3),
            $crate::pin_bank!(@any $p.PIN_4), $crate::pin_bank!(@any $p.PIN_5),
            $crate::pin_bank!(@any $p.PIN_6), $crate::pin_bank!(@any $p.PIN_7),
            $crate::pin_bank!(@any $p.PIN_8), $crate::pin_bank!(@any $p.PIN_9),
            $crate::pin_bank!(@any $p.PIN_10), $crate::pin_bank!(@any $p.PIN_11),
            $crate::pin_bank!(@any $p.PIN_12), $crate::pin_bank!(@any $p.PIN_13),
            $crate::pin_bank!(@any $p.PIN_14), $crate::pin_bank!(@any $p.PIN_15),
            $crate::pin_bank!(@any $p.PIN_16), $crate::pin_bank!(@any $p.PIN_17),
            $crate::pin_bank!(@any $p.PIN_18), $crate::pin_bank!(@any $p.PIN_19),
            $crate::pin_bank!(@any $p.PIN_20), $crate::pin_bank!(@any $p.PIN_21),
            $crate::pin_bank!(@any $p.PIN_22), $crate::pin_bank!(@any $p.PIN_23),
            $crate::pin_bank!(@any $p.PIN_24), $crate::pin_bank!(@any $p.PIN_25),
            $crate::pin_bank!(@any $p.PIN_26), $crate::pin_bank!(@any $p.PIN_27),
            $crate::pin_bank!(@any $p.PIN_28), $crate::pin_bank!(@any $p.PIN_29),
        ])
    };
}

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken by another channel
    AlreadyTaken(u8),
}

/// Every GPIO, taken out by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Create a bank owning all GPIOs, indexed by number
    pub fn new(pins: [Peri<'static, AnyPin>; GPIO_COUNT]) -> Self {
        Self {
            pins: pins.map(Some),
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.pins
            .get_mut(pin as usize)
            .ok_or(PinError::InvalidPin(pin))?
            .take()
            .ok_or(PinError::AlreadyTaken(pin))
    }

    /// Check if a pin is still in the bank
    pub fn is_available(&self, pin: u8) -> bool {
        matches!(self.pins.get(pin as usize), Some(Some(_)))
    }
}
