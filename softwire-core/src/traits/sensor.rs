//! Temperature sensor traits

use crate::temperature::Q7;

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// No device acknowledged any of its possible addresses
    NotFound,
}

/// Trait for temperature sensors
///
/// Bus sensors are read through `&mut self` because every read is a bus
/// transaction.
pub trait TemperatureSensor {
    /// Read the current temperature as Q8.7
    fn read_q7(&mut self) -> Result<Q7, SensorError>;

    /// Read the current temperature in degrees Celsius
    ///
    /// Returns a fixed-point value with 0.1°C resolution.
    /// For example, 45.5°C is returned as 455.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        self.read_q7().map(Q7::to_celsius_x10)
    }

    /// Read the current temperature in whole degrees Celsius
    fn read_celsius(&mut self) -> Result<i16, SensorError> {
        self.read_q7().map(Q7::to_celsius)
    }

    /// Check if the sensor reading is valid
    fn is_valid(&mut self) -> bool {
        self.read_q7().is_ok()
    }
}
