//! Pin strings
//!
//! Board files name pins with a short prefix syntax:
//!
//! | String      | Pin | Active-low | Pull      |
//! |-------------|-----|------------|-----------|
//! | `gpio11`    | 11  | no         | none      |
//! | `!gpio12`   | 12  | yes        | none      |
//! | `^gpio4`    | 4   | no         | up        |
//! | `~gpio4`    | 4   | no         | down      |
//! | `!^gpio0`   | 0   | yes        | up        |
//!
//! Prefixes may appear in any order, each at most once. `^~` together
//! selects both pulls.

use irqio_hal::{Pull, GPIO_COUNT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parsed pin description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinSpec {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub active_low: bool,
    /// Internal pull resistors
    pub pull: Pull,
}

impl PinSpec {
    /// Active-high pin without pulls
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            active_low: false,
            pull: Pull::None,
        }
    }

    /// Active-low pin without pulls
    pub const fn active_low(pin: u8) -> Self {
        Self {
            pin,
            active_low: true,
            pull: Pull::None,
        }
    }

    /// Same pin with the given pulls
    pub const fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }
}

/// Parse a pin string from config
///
/// Returns `None` for unknown prefixes, repeated prefixes, a missing
/// `gpio` stem, or a pin number outside the port.
pub fn parse_pin_spec(s: &str) -> Option<PinSpec> {
    let mut s = s.trim();
    let mut active_low = false;
    let mut pull_up = false;
    let mut pull_down = false;

    loop {
        let flag = match s.chars().next()? {
            '!' => &mut active_low,
            '^' => &mut pull_up,
            '~' => &mut pull_down,
            _ => break,
        };
        if *flag {
            return None;
        }
        *flag = true;
        s = &s[1..];
    }

    let digits = s.strip_prefix("gpio")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let pin: u8 = digits.parse().ok()?;
    if pin >= GPIO_COUNT {
        return None;
    }

    let pull = match (pull_up, pull_down) {
        (false, false) => Pull::None,
        (true, false) => Pull::Up,
        (false, true) => Pull::Down,
        (true, true) => Pull::UpDown,
    };

    Some(PinSpec {
        pin,
        active_low,
        pull,
    })
}
