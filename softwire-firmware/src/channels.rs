//! Inter-task communication channels
//!
//! Defines the static signals shared between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Temperature reading signal (updated by sensor task)
/// Value is temperature in 0.1°C units (e.g., 455 = 45.5°C), or None when no sensor answered
pub static TEMP_READING: Signal<CriticalSectionRawMutex, Option<i16>> = Signal::new();
