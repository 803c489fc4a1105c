//! Driver status codes
//!
//! Vendor drivers report failure through integer status codes. Platform
//! crates translate those into [`HalError`] so the upper layers can match
//! on them without knowing the vendor's numbering.

use core::fmt;

/// Failure reported by a platform driver call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Argument rejected (bad pin number, unsupported mode combination)
    InvalidArg,
    /// Operation not valid in the current driver state
    InvalidState,
    /// Driver could not allocate memory
    NoMem,
    /// Handler or resource not found
    NotFound,
    /// Operation timed out
    Timeout,
    /// Generic failure
    Fail,
    /// Vendor status code with no dedicated variant
    Other(i32),
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::InvalidArg => f.write_str("invalid argument"),
            HalError::InvalidState => f.write_str("invalid state"),
            HalError::NoMem => f.write_str("out of memory"),
            HalError::NotFound => f.write_str("not found"),
            HalError::Timeout => f.write_str("timed out"),
            HalError::Fail => f.write_str("failed"),
            HalError::Other(code) => write!(f, "driver status {}", code),
        }
    }
}
