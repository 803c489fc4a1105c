//! Configuration types
//!
//! Board-agnostic pin and bus descriptions, optionally (de)serializable
//! with the `serde` feature.

pub mod pins;

pub use irqio_hal::I2cConfig;
pub use pins::{parse_pin_spec, PinSpec};
