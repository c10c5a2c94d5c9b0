//! GPIO pin abstractions
//!
//! Provides traits for digital pins that can be implemented by
//! chip-specific HALs. A bus line needs a pin that can switch between
//! input and output at runtime, which is what [`FlexPin`] adds.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose direction can change at runtime
///
/// Open-collector buses release a line by switching it to input and let the
/// external pull-up bring it high. The output latch keeps its value while the
/// pin is an input, so `set_high` followed by `set_as_output` drives high
/// without a glitch low.
pub trait FlexPin: OutputPin + InputPin {
    /// Switch the pin to input (high impedance)
    fn set_as_input(&mut self);

    /// Switch the pin to push-pull output, driving the latched level
    fn set_as_output(&mut self);
}
