//! I2C bus abstractions
//!
//! Transfers go through `embedded_hal::i2c::I2c`; this module only adds
//! the master-mode setup step and the error classification shared by the
//! register helpers in `irqio-core`.

use embedded_hal::i2c::ErrorKind;

use crate::error::HalError;

/// Transaction timeout used by the vendor driver calls
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// I2C master configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct I2cConfig {
    /// SDA pin number
    pub sda: u8,
    /// SCL pin number
    pub scl: u8,
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Enable the internal pull-up on SDA
    pub sda_pullup: bool,
    /// Enable the internal pull-up on SCL
    pub scl_pullup: bool,
    /// Per-transaction timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            sda: 21,
            scl: 22,
            frequency: Self::STANDARD,
            sda_pullup: false,
            scl_pullup: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: u32 = 100_000;

    /// Fast mode (400 kHz)
    pub const FAST: u32 = 400_000;

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: u32 = 1_000_000;

    /// Master on the given pins at the given clock, other fields default
    pub fn master(sda: u8, scl: u8, frequency: u32) -> Self {
        Self {
            sda,
            scl,
            frequency,
            ..Self::default()
        }
    }

    /// Enable both internal pull-ups
    pub fn with_pullups(mut self) -> Self {
        self.sda_pullup = true;
        self.scl_pullup = true;
        self
    }
}

/// Master-mode driver installation
///
/// The returned bus owns the installed driver; dropping it is expected to
/// uninstall the driver on the platform side.
pub trait I2cDriver {
    /// Bus handle returned once the driver is installed
    type Bus: embedded_hal::i2c::I2c;

    /// Configure the port and install the master driver
    fn install(&mut self, port: u8, config: &I2cConfig) -> Result<Self::Bus, HalError>;
}

/// Error from I2C transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cBusError {
    /// Bus error
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Overrun
    Overrun,
    /// Timeout or other platform error
    Other,
}

impl From<ErrorKind> for I2cBusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Bus => I2cBusError::Bus,
            ErrorKind::ArbitrationLoss => I2cBusError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => I2cBusError::Nack,
            ErrorKind::Overrun => I2cBusError::Overrun,
            _ => I2cBusError::Other,
        }
    }
}

impl I2cBusError {
    /// Classify any `embedded-hal` I2C error
    pub fn classify<E: embedded_hal::i2c::Error>(error: &E) -> Self {
        error.kind().into()
    }
}
