//! RP2040-specific HAL for the softwire bus stack
//!
//! This crate provides RP2040 implementations of the `softwire-hal`
//! traits:
//!
//! - [`gpio::FlexLine`] - a GPIO that switches between input and output
//! - [`Rp2040Lines`] - the clock/data pair for one software bus
//! - [`pins::PinBank`] - GPIOs taken by number for config-driven wiring
//! - [`BusDelay`] - blocking delay used between line transitions

#![no_std]

pub mod gpio;
pub mod pins;

pub use gpio::{FlexLine, Rp2040Lines};
pub use pins::{PinBank, PinError};

/// Blocking delay for bus timing
///
/// `embassy_time::Delay` busy-waits on the time driver and implements
/// `embedded_hal::delay::DelayNs`, which is what the bit-bang engine takes.
pub type BusDelay = embassy_time::Delay;

// Re-export shared traits from softwire-hal for convenience
pub use softwire_hal::{BusLines, Channel, FlexPin};
