//! Temperature report task
//!
//! Logs the published temperature whenever it changes.

use defmt::*;

use crate::channels::TEMP_READING;

#[embassy_executor::task]
pub async fn report_task() {
    let mut last: Option<i16> = None;

    loop {
        let reading = TEMP_READING.wait().await;
        if reading == last {
            continue;
        }

        match reading {
            Some(t) => {
                let sign = if t < 0 { "-" } else { "" };
                info!("Temperature: {}{}.{}°C", sign, (t / 10).abs(), (t % 10).abs());
            }
            None => warn!("Temperature: no sensor"),
        }
        last = reading;
    }
}
