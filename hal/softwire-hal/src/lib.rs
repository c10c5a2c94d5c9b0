//! Softwire Hardware Abstraction Layer
//!
//! This crate defines the traits a chip-specific HAL implements so the
//! software two-wire bus can run on it. The bus protocol itself lives in
//! `softwire-drivers`; nothing here knows about START/STOP or ACK timing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  softwire-drivers (bit-bang I2C, LM92,  │
//! │  DS2482)                                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  softwire-hal-rp2040 (FlexPin impl)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::FlexPin`] - Digital I/O
//! - [`lines::BusLines`] - The clock/data pair of one bus channel
//! - [`i2c::I2cBus`] - Block-level I2C master operations

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod gpio;
pub mod i2c;
pub mod lines;

// Re-export key types at crate root for convenience
pub use channel::{Channel, ChannelTable};
pub use gpio::{FlexPin, InputPin, OutputPin};
pub use i2c::{Ack, Address, Direction, I2cBus, I2cConfig};
pub use lines::{BusLines, Level, Line, Mode, PinPair};
