//! 1-Wire bus masters reached over I2C

pub mod ds2482;

pub use ds2482::{BridgeError, Config, Ds2482, Status};
