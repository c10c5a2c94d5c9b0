//! Board-agnostic core types for the softwire bus stack
//!
//! This crate contains everything that does not touch a bus line:
//!
//! - Q8.7 fixed-point temperature values
//! - Sensor traits and errors
//! - Board configuration (which channels are wired, device addresses)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod temperature;
pub mod traits;

pub use temperature::Q7;
pub use traits::{SensorError, TemperatureSensor};
