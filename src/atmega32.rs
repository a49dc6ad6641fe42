//! Register map of the ATmega32
//!
//! Data-space addresses (I/O address + 0x20) and bit positions of the
//! registers driven by this crate, as listed in the "Register Summary" of the
//! ATmega32 datasheet.

use core::cell::Cell;

use critical_section::Mutex;

use crate::reg::{Address, Mmio};

macro_rules! port_registers {
    ($($X:ident: $pin:literal,)+) => {
        paste::paste! {
            $(
                #[doc = "Input pins register of port " $X]
                pub const [<PIN $X>]: Address = $pin;
                #[doc = "Data direction register of port " $X]
                pub const [<DDR $X>]: Address = $pin + 1;
                #[doc = "Data register of port " $X]
                pub const [<PORT $X>]: Address = $pin + 2;
            )+
        }
    };
}

port_registers! {
    A: 0x39,
    B: 0x36,
    C: 0x33,
    D: 0x30,
}

/// MCU control and status register (holds ISC2)
pub const MCUCSR: Address = 0x54;
/// MCU control register (holds ISC11..ISC00)
pub const MCUCR: Address = 0x55;
/// General interrupt flag register
pub const GIFR: Address = 0x5A;
/// General interrupt control register
pub const GICR: Address = 0x5B;

/// Bit positions in [`GICR`](super::GICR)
pub mod gicr {
    pub const INT1: u8 = 7;
    pub const INT0: u8 = 6;
    pub const INT2: u8 = 5;
}

/// Bit positions in [`GIFR`](super::GIFR)
pub mod gifr {
    pub const INTF1: u8 = 7;
    pub const INTF0: u8 = 6;
    pub const INTF2: u8 = 5;
}

/// Bit positions in [`MCUCR`](super::MCUCR)
pub mod mcucr {
    pub const ISC11: u8 = 3;
    pub const ISC10: u8 = 2;
    pub const ISC01: u8 = 1;
    pub const ISC00: u8 = 0;
}

/// Bit positions in [`MCUCSR`](super::MCUCSR)
pub mod mcucsr {
    pub const ISC2: u8 = 6;
}

/// Interrupt vector numbers (`__vector_N`)
pub mod vector {
    pub const INT0: u8 = 1;
    pub const INT1: u8 = 2;
    pub const INT2: u8 = 3;
}

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// All the peripherals handled by this crate
#[allow(non_snake_case)]
#[derive(Debug)]
pub struct Peripherals {
    /// External interrupt registers (GICR, GIFR, MCUCR, MCUCSR)
    pub EXTI: Mmio,
    /// Port A..D registers
    pub GPIO: Mmio,
}

impl Peripherals {
    /// Returns all the peripherals *once*
    pub fn take() -> Option<Self> {
        critical_section::with(|cs| {
            if TAKEN.borrow(cs).replace(true) {
                None
            } else {
                // SAFETY: guarded by `TAKEN`
                Some(unsafe { Peripherals::steal() })
            }
        })
    }

    /// Unchecked version of [`Peripherals::take`]
    ///
    /// # Safety
    ///
    /// Each returned handle aliases the register file; the caller is
    /// responsible for not configuring the same register from two places.
    pub unsafe fn steal() -> Self {
        Peripherals {
            EXTI: Mmio::steal(),
            GPIO: Mmio::steal(),
        }
    }
}
