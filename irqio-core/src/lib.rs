//! Strongly typed GPIO and I2C access on top of `irqio-hal`
//!
//! This crate contains the logic that sits between an application and the
//! platform's pin and bus drivers:
//!
//! - Active-low inputs and outputs (levels and edge triggers inverted)
//! - One-time installation of the pin interrupt service
//! - Per-pin interrupt contexts and the dispatcher run from the vector
//! - Mutually exclusive delivery to an event loop or a queue
//! - Register reads and writes over an I2C master bus
//! - Pin-string configuration parsing
//!
//! # Example
//!
//! ```ignore
//! static BUTTON_IRQ: InterruptContext<PlatformLoop> = InterruptContext::new();
//! static EVENTS: Channel<CriticalSectionRawMutex, u8, 8> = Channel::new();
//!
//! // The install gate takes a blocking RTOS mutex
//! let gpio: Gpio<_, _, RtosRawMutex> = Gpio::new(PlatformPins::take(), &DEFAULT_LOOP);
//! let mut button = gpio.input_active_low(0)?.into_interrupt(&BUTTON_IRQ)?;
//! button.set_queue(&EVENTS)?;
//! button.enable_interrupt(Trigger::RisingEdge)?; // fires on the press
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod gpio;
pub mod i2c;
pub mod isr;

#[cfg(test)]
mod mock;

pub use config::{parse_pin_spec, PinSpec};
pub use error::Error;
pub use gpio::{Gpio, Input, InterruptInput, Output, PinBase};
pub use i2c::RegisterBus;
pub use isr::{InterruptContext, IsrService, RegistrationKind};
