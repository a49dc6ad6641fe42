//! External interrupt controller
//!
//! The ATmega32 has three external interrupt lines. Each one has an enable
//! bit in GICR, a pending flag in GIFR and a sense control field selecting the
//! [`TriggerEdge`]. See the ATmega32 datasheet, section "External Interrupts".
//!
//! | Line  | Pin | Sense control        | Edges                |
//! |-------|-----|----------------------|----------------------|
//! | INT0  | PD2 | MCUCR ISC01:ISC00    | all                  |
//! | INT1  | PD3 | MCUCR ISC11:ISC10    | all                  |
//! | INT2  | PB2 | MCUCSR ISC2          | falling, rising      |
//!
//! [`Exti`] keeps one [`Callback`] per line. The interrupt vector of a line
//! calls [`Exti::dispatch`], which runs the registered callback, if any.
//!
//! ```
//! use atmega32_hal::exti::{Exti, Line, TriggerEdge};
//! use atmega32_hal::sim::Mcu;
//!
//! fn on_edge() {}
//!
//! let mcu = Mcu::new();
//! let exti = Exti::new(&mcu);
//!
//! exti.configure(Line::Exti2, TriggerEdge::Falling);
//! exti.register_callback(Line::Exti2, Some(on_edge));
//! assert!(exti.is_enabled(Line::Exti2));
//! ```
//!
//! On the device the controller lives in a `static` so the vector functions
//! can reach it, see [`make_exti_handler!`](crate::make_exti_handler).

use core::convert::TryFrom;
use core::fmt;

use crate::atmega32::{self, gicr, gifr, mcucr, mcucsr, vector};
use crate::gpio::{Pin, Port};
use crate::log::{debug, trace};
use crate::reg::{self, RegisterAccess};
use crate::Switch;

mod callback;
pub mod config;

pub use callback::Callback;
pub use config::Config;

use callback::Callbacks;

/// EXTI error
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// Raw line number outside 0..=2
    InvalidLine(u8),
    /// Raw sense control value outside 0..=3
    InvalidEdge(u8),
    /// The line cannot detect this edge
    UnsupportedEdge {
        /// Line that was configured
        line: Line,
        /// Edge that was requested
        edge: TriggerEdge,
    },
}

/// External interrupt line
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// INT0, sourced by PD2
    Exti0,
    /// INT1, sourced by PD3
    Exti1,
    /// INT2, sourced by PB2
    Exti2,
}

impl Line {
    /// Number of lines
    pub const COUNT: usize = 3;

    /// All lines, in vector (priority) order
    pub const ALL: [Line; Line::COUNT] = [Line::Exti0, Line::Exti1, Line::Exti2];

    /// Returns the line corresponding to a raw line number.
    ///
    /// If `raw` is not a valid line, `None` is returned.
    pub const fn from_raw_line(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Line::Exti0),
            1 => Some(Line::Exti1),
            2 => Some(Line::Exti2),
            _ => None,
        }
    }

    /// Returns the raw line number.
    pub const fn raw_line(self) -> u8 {
        self as u8
    }

    /// Interrupt vector number of this line.
    pub const fn interrupt(self) -> u8 {
        match self {
            Line::Exti0 => vector::INT0,
            Line::Exti1 => vector::INT1,
            Line::Exti2 => vector::INT2,
        }
    }

    /// GPIO pin sensed by this line.
    pub const fn pin(self) -> (Port, Pin) {
        match self {
            Line::Exti0 => (Port::D, Pin::P2),
            Line::Exti1 => (Port::D, Pin::P3),
            Line::Exti2 => (Port::B, Pin::P2),
        }
    }

    /// Whether this line can detect `edge`.
    ///
    /// INT2 is edge triggered only.
    pub const fn supports(self, edge: TriggerEdge) -> bool {
        match self {
            Line::Exti0 | Line::Exti1 => true,
            Line::Exti2 => matches!(edge, TriggerEdge::Falling | TriggerEdge::Rising),
        }
    }

    pub(crate) const fn enable_bit(self) -> u8 {
        match self {
            Line::Exti0 => gicr::INT0,
            Line::Exti1 => gicr::INT1,
            Line::Exti2 => gicr::INT2,
        }
    }

    pub(crate) const fn flag_bit(self) -> u8 {
        match self {
            Line::Exti0 => gifr::INTF0,
            Line::Exti1 => gifr::INTF1,
            Line::Exti2 => gifr::INTF2,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Line {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Line::from_raw_line(raw).ok_or(Error::InvalidLine(raw))
    }
}

/// Condition that sets the pending flag of a line
///
/// The discriminant is the two bit ISCn1:ISCn0 encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TriggerEdge {
    /// The low level of the pin
    LowLevel = 0b00,
    /// Any logical change of the pin
    AnyChange = 0b01,
    /// Falling edge of voltage
    Falling = 0b10,
    /// Rising edge of voltage
    Rising = 0b11,
}

impl TriggerEdge {
    /// Sense control bits of this edge.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decodes the two lowest bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => TriggerEdge::LowLevel,
            0b01 => TriggerEdge::AnyChange,
            0b10 => TriggerEdge::Falling,
            _ => TriggerEdge::Rising,
        }
    }
}

impl TryFrom<u8> for TriggerEdge {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        if raw <= 0b11 {
            Ok(TriggerEdge::from_bits(raw))
        } else {
            Err(Error::InvalidEdge(raw))
        }
    }
}

/// External interrupt controller
///
/// Owns the register access for GICR, GIFR, MCUCR and MCUCSR and the callback
/// table. No configuration is cached: every accessor reads or writes the
/// registers directly.
pub struct Exti<B> {
    bus: B,
    callbacks: Callbacks,
}

impl<B> Exti<B> {
    /// Creates the controller with every callback slot empty.
    ///
    /// This is a `const fn`, so the controller can be placed in a `static`
    /// shared with the interrupt vectors.
    pub const fn new(bus: B) -> Self {
        Exti {
            bus,
            callbacks: Callbacks::new(),
        }
    }

    /// Releases the register access.
    pub fn free(self) -> B {
        self.bus
    }

    /// Registers `callback` for `line`, returning the previous one.
    ///
    /// The new callback replaces the old one, they are not chained. Pass
    /// `None` to unregister. The slot is updated inside a critical section,
    /// so a concurrently firing vector sees either the old or the new
    /// callback.
    pub fn register_callback(&self, line: Line, callback: Option<Callback>) -> Option<Callback> {
        trace!("EXTI {}: callback registered: {}", line, callback.is_some());
        self.callbacks.replace(line, callback)
    }

    /// Removes the callback of `line`, returning it.
    pub fn unregister_callback(&self, line: Line) -> Option<Callback> {
        self.register_callback(line, None)
    }

    /// Currently registered callback of `line`.
    pub fn callback(&self, line: Line) -> Option<Callback> {
        self.callbacks.get(line)
    }

    /// Runs the callback of `line`, if one is registered.
    ///
    /// Call this from the interrupt vector of `line`. It neither reads nor
    /// clears the pending flag, the hardware clears it on vector entry.
    #[inline]
    pub fn dispatch(&self, line: Line) {
        self.callbacks.dispatch(line)
    }
}

impl<B: RegisterAccess> Exti<B> {
    /// Configure external interrupts of `line`
    pub fn configure_interrupt(&self, line: Line, enable: impl Into<Switch>) {
        let enable: Switch = enable.into();
        trace!("EXTI {}: {}", line, enable);
        match enable {
            Switch::On => reg::set_bit(&self.bus, atmega32::GICR, line.enable_bit()),
            Switch::Off => reg::clear_bit(&self.bus, atmega32::GICR, line.enable_bit()),
        }
    }

    /// Enable external interrupts of `line`
    ///
    /// # Note
    ///
    /// Interrupts are only taken while the global interrupt flag in SREG is
    /// set as well.
    pub fn enable(&self, line: Line) {
        self.configure_interrupt(line, Switch::On)
    }

    /// Disable external interrupts of `line`
    pub fn disable(&self, line: Line) {
        self.configure_interrupt(line, Switch::Off)
    }

    /// Reads the enable bit of `line`
    pub fn is_enabled(&self, line: Line) -> bool {
        reg::get_bit(&self.bus, atmega32::GICR, line.enable_bit())
    }

    /// Selects the condition that sets the pending flag of `line`
    ///
    /// INT2 only detects falling and rising edges. Any other edge selects
    /// [`TriggerEdge::Rising`] on INT2. Use
    /// [`try_set_trigger_edge`](Exti::try_set_trigger_edge) to reject those
    /// edges instead.
    ///
    /// Changing the sense control may set the pending flag. Clear it before
    /// enabling the line, or use [`configure`](Exti::configure).
    pub fn set_trigger_edge(&self, line: Line, edge: TriggerEdge) {
        trace!("EXTI {}: trigger on {}", line, edge);
        match line {
            Line::Exti0 => reg::modify_at(
                &self.bus,
                atmega32::MCUCR,
                2,
                mcucr::ISC00 / 2,
                edge.bits(),
            ),
            Line::Exti1 => reg::modify_at(
                &self.bus,
                atmega32::MCUCR,
                2,
                mcucr::ISC10 / 2,
                edge.bits(),
            ),
            Line::Exti2 => {
                let rising = match edge {
                    TriggerEdge::Falling => false,
                    TriggerEdge::Rising => true,
                    _ => {
                        debug!("EXTI {}: {} unsupported, using rising edge", line, edge);
                        true
                    }
                };
                reg::modify_at(
                    &self.bus,
                    atmega32::MCUCSR,
                    1,
                    mcucsr::ISC2,
                    u8::from(rising),
                );
            }
        }
    }

    /// Like [`set_trigger_edge`](Exti::set_trigger_edge), but refuses edges
    /// the line cannot detect and leaves the register untouched.
    pub fn try_set_trigger_edge(&self, line: Line, edge: TriggerEdge) -> Result<(), Error> {
        if !line.supports(edge) {
            return Err(Error::UnsupportedEdge { line, edge });
        }
        self.set_trigger_edge(line, edge);
        Ok(())
    }

    /// Reads the pending flag of `line`
    pub fn is_pending(&self, line: Line) -> bool {
        reg::get_bit(&self.bus, atmega32::GIFR, line.flag_bit())
    }

    /// Clears the pending flag of `line`
    ///
    /// GIFR is write-one-to-clear: a one is written to the flag bit of `line`
    /// and zero everywhere else, which leaves the flags of the other lines
    /// alone.
    pub fn clear_pending(&self, line: Line) {
        reg::write_one(&self.bus, atmega32::GIFR, line.flag_bit())
    }

    /// Writes a one to the pending flag of `line`
    ///
    /// # Note
    ///
    /// GIFR cannot be set from software. This is the same write as
    /// [`clear_pending`](Exti::clear_pending), so the flag ends up cleared.
    /// A line can be triggered from software by driving its pin while it is
    /// configured as an output.
    pub fn set_pending(&self, line: Line) {
        reg::write_one(&self.bus, atmega32::GIFR, line.flag_bit())
    }

    /// Applies `config` to `line`
    ///
    /// The line is disabled first, then the edge is selected, the pending flag
    /// raised by the edge change is cleared and the callback installed. The
    /// line is only enabled again, if requested, once the callback is in
    /// place.
    pub fn configure(&self, line: Line, config: impl Into<Config>) {
        let config = config.into();
        self.disable(line);
        self.set_trigger_edge(line, config.edge);
        self.clear_pending(line);
        self.register_callback(line, config.callback);
        self.configure_interrupt(line, config.enable);
    }
}

impl<B> fmt::Debug for Exti<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exti").finish()
    }
}

#[cfg(feature = "defmt")]
impl<B> defmt::Format for Exti<B> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Exti");
    }
}

/// Defines the interrupt vector function of a line
///
/// The vector dispatches to the callback registered with the `static`
/// [`Exti`] named as first argument. Attributes in front of the function name
/// are forwarded, which is where the runtime's interrupt attribute goes.
///
/// ```ignore
/// static EXTI: Exti<Mmio> = Exti::new(unsafe { Mmio::steal() });
///
/// make_exti_handler!(EXTI, Exti0 => #[avr_device::interrupt(atmega32)] INT0);
/// make_exti_handler!(EXTI, Exti1 => #[avr_device::interrupt(atmega32)] INT1);
/// ```
#[macro_export]
macro_rules! make_exti_handler {
    ($exti:ident, $line:ident => $(#[$attr:meta])* $vector:ident) => {
        $(#[$attr])*
        #[allow(non_snake_case)]
        fn $vector() {
            $exti.dispatch($crate::exti::Line::$line);
        }
    };
}
