//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and device drivers.

pub mod sensor;

pub use sensor::{SensorError, TemperatureSensor};
