//! Temperature sensor drivers

pub mod lm92;

pub use lm92::{decode, Lm92, Lm92Sensor};
