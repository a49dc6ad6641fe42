//! Types for configuring an external interrupt line.

use super::{Callback, TriggerEdge};
use crate::Switch;

/// Configuration struct for [`Exti::configure`](super::Exti::configure)
///
/// Create a configuration by using `default` in combination with the
/// builder methods. The following snippet configures a line for falling
/// edges, without a callback and left disabled:
/// ```
/// # use atmega32_hal::exti::{Config, TriggerEdge};
/// # use atmega32_hal::Switch;
/// let config = Config::default().edge(TriggerEdge::Falling).enable(false);
///
/// assert!(config.edge == TriggerEdge::Falling);
/// assert!(config.callback.is_none());
/// assert!(config.enable == Switch::Off);
/// ```
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Config {
    /// Condition that sets the pending flag
    pub edge: TriggerEdge,
    /// Procedure run from the interrupt vector
    pub callback: Option<Callback>,
    /// Whether the line is enabled once configured
    pub enable: Switch,
}

impl Config {
    /// Sets the trigger edge.
    pub fn edge(mut self, edge: TriggerEdge) -> Self {
        self.edge = edge;
        self
    }

    /// Sets the callback.
    pub fn callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Leaves the line without a callback.
    pub fn no_callback(mut self) -> Self {
        self.callback = None;
        self
    }

    /// Enables or disables the line once configured.
    pub fn enable(mut self, enable: impl Into<Switch>) -> Self {
        self.enable = enable.into();
        self
    }
}

impl Default for Config {
    /// Falling edge, which every line supports, no callback, enabled.
    fn default() -> Config {
        Config {
            edge: TriggerEdge::Falling,
            callback: None,
            enable: Switch::On,
        }
    }
}

impl From<TriggerEdge> for Config {
    fn from(edge: TriggerEdge) -> Config {
        Config {
            edge,
            ..Default::default()
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Config {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Exti {{ edge: {}, callback: {}, enable: {} }}",
            self.edge,
            self.callback.is_some(),
            self.enable,
        );
    }
}
