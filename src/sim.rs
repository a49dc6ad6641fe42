//! In-memory ATmega32 register file
//!
//! [`Mcu`] implements [`RegisterAccess`] and models the parts of the
//! hardware the drivers of this crate rely on:
//!
//! * `GIFR` is write-one-to-clear and cannot be set by software.
//! * `PINx` is read-only. It reads back `PORTx` for output pins, the
//!   externally driven level for driven input pins, and the pull-up (the
//!   `PORTx` bit) for inputs nobody drives.
//! * The pins of INT0 (PD2), INT1 (PD3) and INT2 (PB2) are sensed after every
//!   register write and every [`drive`](Mcu::drive). Edges matching the sense
//!   control set the line's flag in `GIFR`, also when the pin is an output,
//!   as on the device.
//! * A low level interrupt never sets its flag; the line fires for as long as
//!   the pin is held low.
//!
//! [`Mcu::service`] plays the part of the interrupt hardware: it enters the
//! vector of every enabled line that fires, clearing the flag on entry.
//! The global interrupt flag in SREG is not modelled and always treated as
//! set.
//!
//! ```
//! use atmega32_hal::exti::{Exti, Line, TriggerEdge};
//! use atmega32_hal::gpio::{Level, Pin, Port};
//! use atmega32_hal::sim::Mcu;
//!
//! let mcu = Mcu::new();
//! let exti = Exti::new(&mcu);
//!
//! exti.set_trigger_edge(Line::Exti0, TriggerEdge::Rising);
//! mcu.drive(Port::D, Pin::P2, Level::High);
//! assert!(exti.is_pending(Line::Exti0));
//! ```

use core::array;
use core::cell::Cell;
use core::fmt;

use crate::atmega32::{self, mcucsr};
use crate::exti::{Exti, Line, TriggerEdge};
use crate::gpio::{Level, Pin, Port};
use crate::reg::{Address, RegisterAccess};

/// Size of the I/O part of the data space
const REGISTERS: usize = 0x60;

/// Simulated register file, in its reset state when created
pub struct Mcu {
    registers: [Cell<u8>; REGISTERS],
    external: [Cell<u8>; 4],
    driven: [Cell<u8>; 4],
    sensed: [Cell<Level>; Line::COUNT],
}

impl Mcu {
    /// Creates a register file with every register at its reset value (zero).
    pub fn new() -> Self {
        Mcu {
            registers: array::from_fn(|_| Cell::new(0)),
            external: array::from_fn(|_| Cell::new(0)),
            driven: array::from_fn(|_| Cell::new(0)),
            sensed: array::from_fn(|_| Cell::new(Level::Low)),
        }
    }

    /// Drives `pin` from outside the chip.
    pub fn drive(&self, port: Port, pin: Pin, level: impl Into<Level>) {
        let index = port_index(port);
        let mask = 1 << pin.bit();
        let external = self.external[index].get() & !mask;
        let bit = if level.into() == Level::High { mask } else { 0 };
        self.external[index].set(external | bit);
        self.driven[index].set(self.driven[index].get() | mask);
        self.sense();
    }

    /// Stops driving `pin` from outside the chip.
    pub fn release(&self, port: Port, pin: Pin) {
        let index = port_index(port);
        self.driven[index].set(self.driven[index].get() & !(1 << pin.bit()));
        self.sense();
    }

    /// Level present on `pin`.
    pub fn level(&self, port: Port, pin: Pin) -> Level {
        Level::from(self.pin_register(port) & (1 << pin.bit()) != 0)
    }

    /// Enters the vector of every enabled line that fires, in vector order.
    ///
    /// Edge triggered lines fire when their flag is set; the flag is cleared
    /// on vector entry. Low level lines fire while their pin is low. Returns
    /// the number of vectors entered.
    pub fn service<B: RegisterAccess>(&self, exti: &Exti<B>) -> usize {
        let mut entered = 0;
        for line in Line::ALL {
            if !self.bit(atmega32::GICR, line.enable_bit()) {
                continue;
            }
            let fires = if self.sense_control(line) == TriggerEdge::LowLevel {
                self.line_level(line) == Level::Low
            } else if self.bit(atmega32::GIFR, line.flag_bit()) {
                let flags = self.register(atmega32::GIFR);
                self.set_register(atmega32::GIFR, flags & !(1 << line.flag_bit()));
                true
            } else {
                false
            };
            if fires {
                exti.dispatch(line);
                entered += 1;
            }
        }
        entered
    }

    fn register(&self, address: Address) -> u8 {
        self.registers[address].get()
    }

    fn set_register(&self, address: Address, value: u8) {
        self.registers[address].set(value)
    }

    fn bit(&self, address: Address, bit: u8) -> bool {
        self.register(address) & (1 << bit) != 0
    }

    fn pin_register(&self, port: Port) -> u8 {
        let index = port_index(port);
        let ddr = self.register(port.ddr_address());
        let data = self.register(port.port_address());
        let driven = self.driven[index].get();
        let input = (self.external[index].get() & driven) | (data & !driven);
        (data & ddr) | (input & !ddr)
    }

    fn sense_control(&self, line: Line) -> TriggerEdge {
        let mcucr = self.register(atmega32::MCUCR);
        match line {
            Line::Exti0 => TriggerEdge::from_bits(mcucr),
            Line::Exti1 => TriggerEdge::from_bits(mcucr >> 2),
            Line::Exti2 if self.bit(atmega32::MCUCSR, mcucsr::ISC2) => TriggerEdge::Rising,
            Line::Exti2 => TriggerEdge::Falling,
        }
    }

    fn line_level(&self, line: Line) -> Level {
        let (port, pin) = line.pin();
        self.level(port, pin)
    }

    /// Latches the flag of every line whose pin changed as configured.
    fn sense(&self) {
        for line in Line::ALL {
            let now = self.line_level(line);
            let before = self.sensed[line.index()].replace(now);
            let edge = match self.sense_control(line) {
                TriggerEdge::LowLevel => false,
                TriggerEdge::AnyChange => now != before,
                TriggerEdge::Falling => before == Level::High && now == Level::Low,
                TriggerEdge::Rising => before == Level::Low && now == Level::High,
            };
            if edge {
                let flags = self.register(atmega32::GIFR);
                self.set_register(atmega32::GIFR, flags | (1 << line.flag_bit()));
            }
        }
    }
}

impl Default for Mcu {
    fn default() -> Self {
        Mcu::new()
    }
}

impl RegisterAccess for Mcu {
    fn read(&self, address: Address) -> u8 {
        match Port::ALL.iter().find(|port| port.pin_address() == address) {
            Some(&port) => self.pin_register(port),
            None => self.registers.get(address).map_or(0, Cell::get),
        }
    }

    fn write(&self, address: Address, value: u8) {
        if address >= REGISTERS || Port::ALL.iter().any(|port| port.pin_address() == address) {
            return;
        }
        if address == atmega32::GIFR {
            self.set_register(address, self.register(address) & !value);
        } else {
            self.set_register(address, value);
        }
        self.sense();
    }
}

impl fmt::Debug for Mcu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mcu")
            .field("gicr", &self.register(atmega32::GICR))
            .field("gifr", &self.register(atmega32::GIFR))
            .field("mcucr", &self.register(atmega32::MCUCR))
            .field("mcucsr", &self.register(atmega32::MCUCSR))
            .finish()
    }
}

fn port_index(port: Port) -> usize {
    match port {
        Port::A => 0,
        Port::B => 1,
        Port::C => 2,
        Port::D => 3,
    }
}
