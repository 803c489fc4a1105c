//! GPIO pin abstractions
//!
//! Provides the pin configuration capability that chip-specific HALs
//! implement on top of their vendor GPIO driver.

use core::ops::Not;

use crate::error::HalError;

/// Upper bound on pin numbers (pin masks are 64 bits wide)
pub const GPIO_COUNT: u8 = 64;

/// Physical or logical level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if the level is high
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Apply active-low inversion
    ///
    /// Maps a logical level to its physical level (and back, the mapping
    /// is its own inverse).
    pub fn inverted_if(self, active_low: bool) -> Self {
        if active_low {
            !self
        } else {
            self
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
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
    fn from(level: Level) -> bool {
        level.is_high()
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Digital input
    Input,
    /// Push-pull output
    Output,
}

/// Internal pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pull {
    /// Floating
    #[default]
    None,
    /// Pull-up only
    Up,
    /// Pull-down only
    Down,
    /// Pull-up and pull-down both enabled
    UpDown,
}

/// Signal transition or level that fires a pin interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trigger {
    /// Interrupt disabled
    #[default]
    Disabled,
    /// Rising edge
    RisingEdge,
    /// Falling edge
    FallingEdge,
    /// Both edges
    AnyEdge,
    /// While the pin is low
    LowLevel,
    /// While the pin is high
    HighLevel,
}

impl Trigger {
    /// Mirror the trigger through an inverter
    ///
    /// Rising and falling swap, as do low and high level. `AnyEdge` and
    /// `Disabled` do not depend on polarity and are returned unchanged.
    pub fn inverted(self) -> Self {
        match self {
            Trigger::RisingEdge => Trigger::FallingEdge,
            Trigger::FallingEdge => Trigger::RisingEdge,
            Trigger::LowLevel => Trigger::HighLevel,
            Trigger::HighLevel => Trigger::LowLevel,
            other => other,
        }
    }

    /// Physical trigger for a logical request on a pin
    pub fn physical(self, active_low: bool) -> Self {
        if active_low {
            self.inverted()
        } else {
            self
        }
    }
}

/// Full configuration applied to a single pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Pin number
    pub pin: u8,
    /// Direction
    pub mode: Mode,
    /// Pull resistors
    pub pull: Pull,
    /// Interrupt trigger
    pub trigger: Trigger,
}

impl PinConfig {
    /// Plain input: floating, interrupt disabled
    pub const fn input(pin: u8) -> Self {
        Self {
            pin,
            mode: Mode::Input,
            pull: Pull::None,
            trigger: Trigger::Disabled,
        }
    }

    /// Plain output: no pulls, interrupt disabled
    pub const fn output(pin: u8) -> Self {
        Self {
            pin,
            mode: Mode::Output,
            pull: Pull::None,
            trigger: Trigger::Disabled,
        }
    }

    /// Bitmask selecting this pin, as used by vendor configuration calls
    pub fn pin_mask(&self) -> u64 {
        1u64 << self.pin
    }
}

/// Routine run in interrupt context when an armed pin fires
///
/// The driver stores a `'static` reference and calls it from the vector.
/// Implementations must not block, allocate or take blocking locks.
pub trait InterruptHandler: Sync {
    /// Handle one interrupt
    fn on_interrupt(&self);
}

/// Pin configuration capability
///
/// Wraps the vendor GPIO driver. Methods take `&self` because the vendor
/// driver is a process-wide service that does its own register locking;
/// implementations should be thin handles to it.
pub trait PinDriver {
    /// Apply direction, pulls and trigger to a pin
    fn configure(&self, config: &PinConfig) -> Result<(), HalError>;

    /// Drive an output pin to a physical level
    fn set_level(&self, pin: u8, level: Level) -> Result<(), HalError>;

    /// Sample the physical level of a pin
    fn get_level(&self, pin: u8) -> Level;

    /// Change the pull resistors of a pin
    fn set_pull(&self, pin: u8, pull: Pull) -> Result<(), HalError>;

    /// Set the physical interrupt trigger of a pin
    fn set_trigger(&self, pin: u8, trigger: Trigger) -> Result<(), HalError>;

    /// Install the per-pin interrupt dispatch service
    ///
    /// Called at most once successfully per process; see the install gate
    /// in `irqio-core`.
    fn install_isr_service(&self) -> Result<(), HalError>;

    /// Attach an interrupt handler to a pin
    fn attach_isr(&self, pin: u8, handler: &'static dyn InterruptHandler)
        -> Result<(), HalError>;

    /// Detach the interrupt handler of a pin
    fn detach_isr(&self, pin: u8) -> Result<(), HalError>;
}
