//! Embassy tasks

mod report;
mod sensor;

pub use report::report_task;
pub use sensor::{sensor_task, SensorTaskConfig};
