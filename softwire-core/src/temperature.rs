//! Q8.7 fixed-point temperature
//!
//! The stored integer is the temperature in °C multiplied by 128. Sensors
//! with 1/16 °C resolution land on multiples of 8.

/// Number of fractional bits
pub const FRAC_BITS: u32 = 7;

/// Signed Q8.7 temperature in °C
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Q7(i16);

impl Q7 {
    pub const ZERO: Self = Self(0);

    /// One LSB, 1/128 °C
    pub const EPSILON: Self = Self(1);

    /// Wrap a raw Q8.7 value
    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    /// Whole degrees as Q8.7 (saturating outside -256..256)
    pub const fn from_celsius(celsius: i16) -> Self {
        let raw = (celsius as i32) << FRAC_BITS;
        if raw > i16::MAX as i32 {
            Self(i16::MAX)
        } else if raw < i16::MIN as i32 {
            Self(i16::MIN)
        } else {
            Self(raw as i16)
        }
    }

    /// The raw Q8.7 value
    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Temperature in 0.1 °C units, rounded to nearest
    ///
    /// 25.0625 °C (raw 3208) gives 251.
    pub const fn to_celsius_x10(self) -> i16 {
        let scaled = self.0 as i32 * 10;
        let half = 1 << (FRAC_BITS - 1);
        let rounded = if scaled >= 0 {
            (scaled + half) >> FRAC_BITS
        } else {
            -((-scaled + half) >> FRAC_BITS)
        };
        rounded as i16
    }

    /// Whole degrees, truncated toward zero
    pub const fn to_celsius(self) -> i16 {
        self.0 / (1 << FRAC_BITS)
    }

    /// Fractional part in 1/128 °C, same sign as the value
    pub const fn fraction(self) -> i16 {
        self.0 % (1 << FRAC_BITS)
    }
}
