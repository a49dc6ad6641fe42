//! General Purpose Input / Output
//!
//! Each of the ports A..D has three registers: `DDRx` selects the direction
//! of every pin, `PORTx` holds the output level (or enables the pull-up of an
//! input pin) and `PINx` reads the level present on the pins.
//!
//! [`Gpio`] maps a (port, pin, mode) or (port, pin, level) triple onto those
//! registers. It keeps no state: reads, including the read half of a toggle,
//! always go to the hardware.
//!
//! ```
//! use atmega32_hal::gpio::{Gpio, Level, Mode, Pin, Port};
//! use atmega32_hal::sim::Mcu;
//!
//! let mcu = Mcu::new();
//! let gpio = Gpio::new(&mcu);
//!
//! gpio.set_direction(Port::A, Pin::P3, Mode::Output);
//! gpio.set_value(Port::A, Pin::P3, Level::High);
//! assert_eq!(gpio.get_value(Port::A, Pin::P3), Level::High);
//! ```
//!
//! For use with drivers written against [`embedded_hal`], take a [`PXx`]
//! handle with [`Gpio::pin`].

use core::convert::TryFrom;
use core::fmt;

use crate::atmega32;
use crate::hal::digital::v2::PinState;
use crate::log::trace;
use crate::reg::{self, Address, RegisterAccess};

mod pin;

pub use pin::PXx;

/// GPIO error
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// Raw port number outside 0..=3
    InvalidPort(u8),
    /// Raw pin number outside 0..=7
    InvalidPin(u8),
}

/// GPIO port
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Port A
    A,
    /// Port B
    B,
    /// Port C
    C,
    /// Port D
    D,
}

macro_rules! port_addresses {
    ($($X:ident),+) => {
        paste::paste! {
            impl Port {
                /// Address of the `PINx` register
                pub const fn pin_address(self) -> Address {
                    match self {
                        $(Port::$X => atmega32::[<PIN $X>],)+
                    }
                }

                /// Address of the `DDRx` register
                pub const fn ddr_address(self) -> Address {
                    match self {
                        $(Port::$X => atmega32::[<DDR $X>],)+
                    }
                }

                /// Address of the `PORTx` register
                pub const fn port_address(self) -> Address {
                    match self {
                        $(Port::$X => atmega32::[<PORT $X>],)+
                    }
                }
            }
        }
    };
}

port_addresses!(A, B, C, D);

impl Port {
    /// All ports
    pub const ALL: [Port; 4] = [Port::A, Port::B, Port::C, Port::D];
}

impl TryFrom<u8> for Port {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Port::A),
            1 => Ok(Port::B),
            2 => Ok(Port::C),
            3 => Ok(Port::D),
            _ => Err(Error::InvalidPort(raw)),
        }
    }
}

/// Pin index within a port
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Pin {
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
}

impl Pin {
    /// All pins, in bit order
    pub const ALL: [Pin; 8] = [
        Pin::P0,
        Pin::P1,
        Pin::P2,
        Pin::P3,
        Pin::P4,
        Pin::P5,
        Pin::P6,
        Pin::P7,
    ];

    /// Bit position of this pin in the port registers
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Pin {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Pin::ALL
            .get(usize::from(raw))
            .copied()
            .ok_or(Error::InvalidPin(raw))
    }
}

/// Pin direction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Floating input
    Input,
    /// Push pull output
    Output,
    /// Input with the internal pull-up enabled
    InputPullUp,
}

/// Logic level of a pin
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

impl From<PinState> for Level {
    fn from(state: PinState) -> Self {
        match state {
            PinState::Low => Level::Low,
            PinState::High => Level::High,
        }
    }
}

impl From<Level> for PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        }
    }
}

/// Register mapper for ports A..D
pub struct Gpio<B> {
    bus: B,
}

impl<B> Gpio<B> {
    /// Creates the mapper.
    pub const fn new(bus: B) -> Self {
        Gpio { bus }
    }

    /// Releases the register access.
    pub fn free(self) -> B {
        self.bus
    }
}

impl<B: RegisterAccess> Gpio<B> {
    /// Configures the direction of `pin`
    ///
    /// Inputs get their pull-up switched on or off through `PORTx`, so an
    /// output level previously written to the pin is overwritten.
    pub fn set_direction(&self, port: Port, pin: Pin, mode: Mode) {
        trace!("P{}{}: {}", port, pin.bit(), mode);
        let (ddr, data) = (port.ddr_address(), port.port_address());
        match mode {
            Mode::Output => reg::set_bit(&self.bus, ddr, pin.bit()),
            Mode::InputPullUp => {
                reg::clear_bit(&self.bus, ddr, pin.bit());
                reg::set_bit(&self.bus, data, pin.bit());
            }
            Mode::Input => {
                reg::clear_bit(&self.bus, ddr, pin.bit());
                reg::clear_bit(&self.bus, data, pin.bit());
            }
        }
    }

    /// Drives `pin` to `level`
    pub fn set_value(&self, port: Port, pin: Pin, level: impl Into<Level>) {
        match level.into() {
            Level::High => reg::set_bit(&self.bus, port.port_address(), pin.bit()),
            Level::Low => reg::clear_bit(&self.bus, port.port_address(), pin.bit()),
        }
    }

    /// Reads the level present on `pin`
    pub fn get_value(&self, port: Port, pin: Pin) -> Level {
        Level::from(reg::get_bit(&self.bus, port.pin_address(), pin.bit()))
    }

    /// Reads the level `pin` is set to drive
    pub fn get_output(&self, port: Port, pin: Pin) -> Level {
        Level::from(reg::get_bit(&self.bus, port.port_address(), pin.bit()))
    }

    /// Inverts the output level of `pin`
    pub fn toggle_pin(&self, port: Port, pin: Pin) {
        reg::toggle_bit(&self.bus, port.port_address(), pin.bit())
    }

    /// Inverts the output level of every pin of `port`
    pub fn toggle_port(&self, port: Port) {
        let value = self.bus.read(port.port_address());
        self.bus.write(port.port_address(), !value);
    }

    /// Writes `value` to the data register of `port`
    pub fn write_port(&self, port: Port, value: u8) {
        self.bus.write(port.port_address(), value)
    }

    /// Reads the levels present on all pins of `port`
    pub fn read_port(&self, port: Port) -> u8 {
        self.bus.read(port.pin_address())
    }

    /// Writes the direction of every pin of `port` at once, a one bit being an
    /// output
    pub fn set_port_direction(&self, port: Port, outputs: u8) {
        trace!("P{}: direction {=u8:#x}", port, outputs);
        self.bus.write(port.ddr_address(), outputs)
    }

    /// Erased handle to `pin`, implementing the `embedded-hal` digital traits
    pub fn pin(&self, port: Port, pin: Pin) -> PXx<'_, B> {
        PXx::new(self, port, pin)
    }
}

impl<B> fmt::Debug for Gpio<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gpio").finish()
    }
}

#[cfg(feature = "defmt")]
impl<B> defmt::Format for Gpio<B> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Gpio");
    }
}
