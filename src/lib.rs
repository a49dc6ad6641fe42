/*!
 # ATmega32 GPIO and external interrupt HAL

   This crate drives two peripherals of the ATmega32:

   *   [`gpio`]: pin direction, level and whole-port access for ports A..D
   *   [`exti`]: the external interrupt lines INT0, INT1 and INT2, with one
       application callback per line dispatched from the interrupt vector

   Every driver is generic over [`reg::RegisterAccess`]. On the device use
   [`reg::Mmio`], obtained through [`atmega32::Peripherals::take`]. On the host
   the [`sim`] register file stands in for the hardware.

   ```
   use atmega32_hal::exti::{Exti, Line, TriggerEdge};
   use atmega32_hal::sim::Mcu;

   fn on_button() {}

   let mcu = Mcu::new();
   let exti = Exti::new(&mcu);

   exti.set_trigger_edge(Line::Exti0, TriggerEdge::Rising);
   exti.register_callback(Line::Exti0, Some(on_button));
   exti.enable(Line::Exti0);
   assert!(exti.is_enabled(Line::Exti0));
   ```

   The crate needs a [`critical_section`] implementation in the final binary.
   On AVR this is usually provided by the runtime crate.
*/
#![cfg_attr(not(test), no_std)]

pub use embedded_hal as hal;

mod log;

pub mod atmega32;
pub mod exti;
pub mod gpio;
pub mod prelude;
pub mod reg;
pub mod sim;

/// Enable state of a line or feature
///
/// Converts to and from `bool`, so operations taking `impl Into<Switch>`
/// accept either.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Switch {
    /// Switch something on / enable a thing.
    On,
    /// Switch something off / disable a thing.
    Off,
}

impl From<Switch> for bool {
    fn from(switch: Switch) -> Self {
        matches!(switch, Switch::On)
    }
}

impl From<bool> for Switch {
    fn from(b: bool) -> Self {
        if b {
            Switch::On
        } else {
            Switch::Off
        }
    }
}
