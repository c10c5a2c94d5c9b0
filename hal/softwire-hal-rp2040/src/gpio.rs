//! Bus line GPIOs
//!
//! Wraps `embassy_rp::gpio::Flex` so a pin can be released (input) and
//! pulled low (output) at runtime.

use embassy_rp::gpio::{Flex, Level, Pin, Pull};
use embassy_rp::Peri;
use softwire_hal::{FlexPin, InputPin, OutputPin, PinPair};

/// Clock/data pair of one bus channel
pub type Rp2040Lines<'d> = PinPair<FlexLine<'d>, FlexLine<'d>>;

/// One bus line on an RP2040 GPIO
pub struct FlexLine<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexLine<'d> {
    /// Take a pin as a released bus line
    ///
    /// The internal pull-up (~50 kΩ) is too weak to meet bus rise times on
    /// its own; enable it only as a backup to external resistors.
    pub fn new(pin: Peri<'d, impl Pin>, pull_up: bool) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(if pull_up { Pull::Up } else { Pull::None });
        pin.set_level(Level::High);
        pin.set_as_input();
        Self { pin }
    }
}

impl OutputPin for FlexLine<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}

impl InputPin for FlexLine<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl FlexPin for FlexLine<'_> {
    fn set_as_input(&mut self) {
        self.pin.set_as_input();
    }

    fn set_as_output(&mut self) {
        self.pin.set_as_output();
    }
}
