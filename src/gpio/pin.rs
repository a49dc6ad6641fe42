use core::convert::Infallible;
use core::fmt;

use crate::hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};
use crate::reg::RegisterAccess;

use super::{Gpio, Level, Mode, Pin, Port};

/// Fully erased pin
///
/// The port and pin index are only known at runtime. The handle borrows the
/// [`Gpio`] it was taken from, several handles may exist side by side since
/// they only ever touch their own bit.
pub struct PXx<'a, B> {
    gpio: &'a Gpio<B>,
    port: Port,
    pin: Pin,
}

impl<'a, B> PXx<'a, B> {
    pub(super) fn new(gpio: &'a Gpio<B>, port: Port, pin: Pin) -> Self {
        PXx { gpio, port, pin }
    }

    /// Port of this pin
    pub fn port(&self) -> Port {
        self.port
    }

    /// Index of this pin within its port
    pub fn pin(&self) -> Pin {
        self.pin
    }
}

impl<'a, B: RegisterAccess> PXx<'a, B> {
    /// Configures the direction of this pin
    pub fn set_mode(&mut self, mode: Mode) {
        self.gpio.set_direction(self.port, self.pin, mode)
    }
}

impl<'a, B: RegisterAccess> OutputPin for PXx<'a, B> {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.gpio.set_value(self.port, self.pin, Level::High);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.gpio.set_value(self.port, self.pin, Level::Low);
        Ok(())
    }
}

impl<'a, B: RegisterAccess> InputPin for PXx<'a, B> {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(!self.is_low()?)
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(self.gpio.get_value(self.port, self.pin) == Level::Low)
    }
}

impl<'a, B: RegisterAccess> StatefulOutputPin for PXx<'a, B> {
    fn is_set_high(&self) -> Result<bool, Infallible> {
        self.is_set_low().map(|b| !b)
    }

    fn is_set_low(&self) -> Result<bool, Infallible> {
        Ok(self.gpio.get_output(self.port, self.pin) == Level::Low)
    }
}

impl<'a, B: RegisterAccess> ToggleableOutputPin for PXx<'a, B> {
    type Error = Infallible;

    fn toggle(&mut self) -> Result<(), Infallible> {
        self.gpio.toggle_pin(self.port, self.pin);
        Ok(())
    }
}

impl<'a, B> fmt::Debug for PXx<'a, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PXx")
            .field("port", &self.port)
            .field("pin", &self.pin)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<'a, B> defmt::Format for PXx<'a, B> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "P{}{}", self.port, self.pin.bit());
    }
}
