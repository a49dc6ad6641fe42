//! Prelude

pub use crate::hal::digital::v2::InputPin as _atmega32_hal_digital_InputPin;
pub use crate::hal::digital::v2::OutputPin as _atmega32_hal_digital_OutputPin;
pub use crate::hal::digital::v2::StatefulOutputPin as _atmega32_hal_digital_StatefulOutputPin;
pub use crate::hal::digital::v2::ToggleableOutputPin as _atmega32_hal_digital_ToggleableOutputPin;
pub use crate::reg::RegisterAccess as _atmega32_hal_reg_RegisterAccess;
