//! Softwire - software I2C bus firmware
//!
//! Main firmware binary for RP2040 boards with devices on bit-banged I2C
//! channels: an LM92 temperature sensor read periodically, and DS2482
//! 1-Wire bridges detected at startup.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use softwire_core::config::BoardConfig;
use softwire_drivers::{BitBangI2c, Ds2482};
use softwire_hal::{Channel, ChannelTable, PinPair};
use softwire_hal_rp2040::{pin_bank, BusDelay, FlexLine, PinBank, Rp2040Lines};

mod channels;
mod config;
mod tasks;

/// Software I2C master on two RP2040 GPIOs
pub type Bus = BitBangI2c<Rp2040Lines<'static>, BusDelay>;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Softwire firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let board = config::load();
    let mut bank = pin_bank!(p);
    let mut buses = bind_channels(&board, &mut bank);

    for (channel, bus) in buses.iter_mut() {
        if let Err(e) = bus.reset_bus() {
            warn!("{}: bus recovery failed: {} (code {})", channel, e, e.code());
        }
        bus.init();

        if board.scan_on_boot {
            let found = bus.scan();
            info!("{}: {} device(s)", channel, found.len());
            for address in found.iter() {
                info!("{}: device at {=u8:#04x}", channel, *address);
            }
        }
    }

    match buses.get_mut(board.bridge_channel) {
        Some(bus) => {
            for base in board.bridge_bases {
                if Ds2482::from_base(base).detect(bus) {
                    info!("DS2482 at {=u8:#04x}", base);
                }
            }
        }
        None => warn!("Bridge channel {} not wired", board.bridge_channel),
    }

    let sensor_config = tasks::SensorTaskConfig {
        period_ms: board.sensor_period_ms,
        ..Default::default()
    };

    // Spawn tasks
    spawner.spawn(tasks::report_task()).unwrap();
    match buses.take(board.sensor_channel) {
        Some(bus) => spawner
            .spawn(tasks::sensor_task(bus, sensor_config))
            .unwrap(),
        None => error!("Sensor channel {} not wired", board.sensor_channel),
    }

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Build a bus for every wired channel
///
/// A channel whose pins can't be taken is logged and left unbound.
fn bind_channels(board: &BoardConfig, bank: &mut PinBank) -> ChannelTable<Bus> {
    let mut buses = ChannelTable::new();

    for channel in Channel::ALL {
        let Some(wiring) = board.channel(channel) else {
            continue;
        };

        let (scl, sda) = match (bank.take(wiring.scl.pin), bank.take(wiring.sda.pin)) {
            (Ok(scl), Ok(sda)) => (scl, sda),
            (Err(e), _) | (_, Err(e)) => {
                error!("{}: {}", channel, e);
                continue;
            }
        };

        let lines = PinPair::new(
            FlexLine::new(scl, wiring.scl.pull_up),
            FlexLine::new(sda, wiring.sda.pull_up),
        );
        buses.insert(channel, BitBangI2c::new(lines, embassy_time::Delay));
    }

    buses
}
