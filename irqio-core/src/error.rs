//! Error taxonomy
//!
//! Every fallible operation returns [`Error`]; the interrupt dispatcher is
//! the only component that never reports one.

use core::fmt;

use irqio_hal::{HalError, I2cBusError};

/// Errors returned by pin, interrupt and register operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Pin, mode or pull combination rejected by the platform
    Configuration(HalError),
    /// Interrupt service could not be installed
    ///
    /// The install flag stays false; the next `enable_interrupt` retries.
    Installation(HalError),
    /// Event handler attach or detach failed
    ///
    /// The pin is left with no delivery mechanism registered.
    Registration(HalError),
    /// I2C transfer failed (NACK, bus fault, timeout)
    Transport(I2cBusError),
}

impl Error {
    /// Underlying driver status, if the error came from a driver call
    pub fn hal_error(&self) -> Option<HalError> {
        match self {
            Error::Configuration(e) | Error::Installation(e) | Error::Registration(e) => Some(*e),
            Error::Transport(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "pin configuration rejected: {}", e),
            Error::Installation(e) => write!(f, "interrupt service install failed: {}", e),
            Error::Registration(e) => write!(f, "event handler registration failed: {}", e),
            Error::Transport(e) => write!(f, "i2c transfer failed: {:?}", e),
        }
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
