//! Configuration types
//!
//! Board-agnostic configuration: which bus channels are wired to which
//! GPIOs and where the devices sit on them.

pub mod hardware;

pub use hardware::*;
