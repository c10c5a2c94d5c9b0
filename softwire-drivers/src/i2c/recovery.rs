//! Bus lockup recovery
//!
//! A slave reset or interrupted mid-byte keeps driving the data line low
//! and waits for clocks. Recovery releases both lines, clocks the bus until
//! the data line comes back, then issues START and STOP to reset every
//! slave's bus state machine. The clock is only ever pulled low or
//! released, never driven high while a device may be holding it.

use embedded_hal::delay::DelayNs;

use softwire_hal::{BusLines, Level, Line, Mode};

use super::BitBangI2c;

/// Why the bus could not be recovered
///
/// Discriminants are the numeric recovery codes reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RecoveryError {
    /// Clock line low with nothing driving it from this side
    SclStuckLow = 1,
    /// A device kept stretching the clock past the poll budget
    SdaClockStretchTimeout = 2,
    /// Data line still low after every recovery clock pulse
    SdaStuckLow = 3,
}

impl RecoveryError {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl<L: BusLines, D: DelayNs> BitBangI2c<L, D> {
    /// Try to clear a hung bus
    ///
    /// On success both lines are released high, driven as outputs, and a
    /// START/STOP pair has been issued.
    pub fn reset_bus(&mut self) -> Result<(), RecoveryError> {
        self.lines.set_mode(Line::Clock, Mode::Input);
        self.lines.set_mode(Line::Data, Mode::Input);
        self.settle(self.config.recovery_release_units);

        if self.lines.read(Line::Clock).is_low() {
            #[cfg(feature = "defmt")]
            defmt::warn!("I2C recovery: SCL stuck low");
            return Err(RecoveryError::SclStuckLow);
        }

        let mut pulses = 0;
        while self.lines.read(Line::Data).is_low() && pulses < self.config.recovery_pulses {
            pulses += 1;

            // Latch low before enabling the output so the clock is never driven high
            self.lines.drive(Line::Clock, Level::Low);
            self.lines.set_mode(Line::Clock, Mode::Output);
            self.settle(2);
            self.lines.set_mode(Line::Clock, Mode::Input);
            self.settle(2);

            let mut polls = 0;
            while self.lines.read(Line::Clock).is_low() {
                if polls >= self.config.stretch_polls {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("I2C recovery: clock stretch timeout after {} pulses", pulses);
                    return Err(RecoveryError::SdaClockStretchTimeout);
                }
                polls += 1;
                self.delay.delay_ms(self.config.stretch_poll_ms);
            }
        }

        if self.lines.read(Line::Data).is_low() {
            #[cfg(feature = "defmt")]
            defmt::warn!("I2C recovery: SDA stuck low after {} pulses", pulses);
            return Err(RecoveryError::SdaStuckLow);
        }

        // START then STOP, with the clock still released high
        self.sda(Level::High);
        self.lines.set_mode(Line::Data, Mode::Output);
        self.sda(Level::Low);
        self.settle(2);
        self.sda(Level::High);
        self.settle(2);
        self.scl(Level::High);
        self.lines.set_mode(Line::Clock, Mode::Output);

        #[cfg(feature = "defmt")]
        defmt::debug!("I2C recovery: bus clear after {} pulses", pulses);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::sim::{SimBus, SimDelay, SimDevice};
    use super::*;

    fn master(sim: SimBus) -> BitBangI2c<SimBus, SimDelay> {
        BitBangI2c::new(sim, SimDelay::default())
    }

    #[test]
    fn test_idle_bus_clears() {
        let mut bus = master(SimBus::new());
        assert_eq!(bus.reset_bus(), Ok(()));

        let sim = bus.lines();
        assert_eq!(sim.rising_edges, 0);
        assert_eq!(sim.starts, 1);
        assert_eq!(sim.stops, 1);
        assert!(sim.scl_high());
        assert!(sim.sda_high());
    }

    #[test]
    fn test_scl_stuck_low() {
        let mut bus = master(SimBus::new().with_scl_stuck_low());

        assert_eq!(bus.reset_bus(), Err(RecoveryError::SclStuckLow));
        assert_eq!(bus.lines().clock_ops, 0);
        assert_eq!(bus.lines().rising_edges, 0);
        // Only the release wait
        assert_eq!(bus.delay().elapsed_us(), 400 * 5);
    }

    #[test]
    fn test_sda_released_after_five_pulses() {
        let mut bus = master(SimBus::new().with_sda_stuck(5));

        assert_eq!(bus.reset_bus(), Ok(()));
        let sim = bus.lines();
        assert_eq!(sim.rising_edges, 5);
        assert_eq!(sim.starts, 1);
        assert_eq!(sim.stops, 1);
        assert!(sim.scl_high());
        assert!(sim.sda_high());
    }

    #[test]
    fn test_sda_stuck_low() {
        let mut bus = master(SimBus::new().with_sda_stuck(u32::MAX));

        assert_eq!(bus.reset_bus(), Err(RecoveryError::SdaStuckLow));
        assert_eq!(bus.lines().rising_edges, 20);
        assert_eq!(bus.lines().starts, 0);
    }

    #[test]
    fn test_clock_stretch_timeout() {
        let sim = SimBus::new().with_sda_stuck(u32::MAX).with_stretch_forever();
        let mut bus = master(sim);

        assert_eq!(bus.reset_bus(), Err(RecoveryError::SdaClockStretchTimeout));
        assert_eq!(bus.lines().rising_edges, 0);
        // Full poll budget on the first pulse
        assert!(bus.delay().elapsed_ms() >= 2000);
    }

    #[test]
    fn test_recovery_resets_slave_mid_byte() {
        let device = SimDevice::new(0x48).with_responses(&[0x00, 0x00]);
        let mut bus = master(SimBus::new().with_device(device));
        bus.init();

        // Master gives up mid-read while the device drives a zero bit
        assert!(bus.start(0x91).is_ack());
        bus.lines_mut().set_mode(Line::Data, Mode::Input);
        assert!(!bus.lines().sda_high());

        assert_eq!(bus.reset_bus(), Ok(()));
        assert!(bus.start(0x91).is_ack());
        bus.read_byte(softwire_hal::Ack::Nack);
        bus.stop();
        assert_eq!(bus.lines().missed_starts, 0);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RecoveryError::SclStuckLow.code(), 1);
        assert_eq!(RecoveryError::SdaClockStretchTimeout.code(), 2);
        assert_eq!(RecoveryError::SdaStuckLow.code(), 3);
    }
}
