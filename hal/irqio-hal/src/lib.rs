//! irqio Hardware Abstraction Layer
//!
//! This crate defines the capabilities that `irqio-core` drives. A
//! platform crate implements them on top of the vendor's GPIO, event-loop,
//! queue and I2C drivers; the core never talks to hardware directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application                            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  irqio-core (pins, dispatch, registers) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  irqio-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  platform crate (vendor driver calls)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::PinDriver`] - pin configuration, levels, interrupt attach
//! - [`gpio::InterruptHandler`] - routine run from the interrupt vector
//! - [`event::EventLoop`] - event publishing
//! - [`queue::InterruptQueue`] - interrupt-safe queue push
//! - [`i2c::I2cDriver`] - I2C master installation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod error;
pub mod event;
pub mod gpio;
pub mod i2c;
pub mod queue;

// Re-export key types at crate root for convenience
pub use error::HalError;
pub use event::{EventBase, EventLoop};
pub use gpio::{InterruptHandler, Level, Mode, PinConfig, PinDriver, Pull, Trigger, GPIO_COUNT};
pub use i2c::{I2cBusError, I2cConfig, I2cDriver};
pub use queue::InterruptQueue;
