//! Device drivers for the software two-wire bus
//!
//! This crate provides the bus protocol stack on top of the
//! `softwire-hal` line traits:
//!
//! - Bit-banged I2C master (START/STOP, byte read/write, bus scan)
//! - Bus lockup recovery
//! - LM92 13-bit temperature sensor
//! - DS2482 I2C to 1-Wire bridge

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod i2c;
pub mod onewire;
pub mod sensor;

pub use i2c::{BitBangI2c, I2cError, RecoveryError};
pub use onewire::{BridgeError, Ds2482};
pub use sensor::Lm92;
