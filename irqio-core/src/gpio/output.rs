//! Output pins

use irqio_hal::{Level, PinDriver};

use super::PinBase;
use crate::error::Error;

/// Digital output with active-low handling
///
/// The logical level is cached; [`Output::toggle`] flips the cached value
/// rather than reading back the pad, so a level changed behind this
/// object's back is not observed.
pub struct Output<'d, D> {
    driver: &'d D,
    base: PinBase,
    level: Level,
}

impl<'d, D: PinDriver> Output<'d, D> {
    pub(super) fn new(driver: &'d D, base: PinBase) -> Self {
        Self {
            driver,
            base,
            level: Level::Low,
        }
    }

    /// Pin number
    pub fn pin(&self) -> u8 {
        self.base.pin()
    }

    /// Whether the output is active-low
    pub fn active_low(&self) -> bool {
        self.base.active_low()
    }

    /// Last logical level written
    pub fn level(&self) -> Level {
        self.level
    }

    /// Write a logical level
    pub fn set_level(&mut self, level: Level) -> Result<(), Error> {
        self.level = level;
        self.driver
            .set_level(self.base.pin(), level.inverted_if(self.base.active_low()))
            .map_err(Error::Configuration)
    }

    /// Drive the logical high (asserted) level
    pub fn on(&mut self) -> Result<(), Error> {
        self.set_level(Level::High)
    }

    /// Drive the logical low (deasserted) level
    pub fn off(&mut self) -> Result<(), Error> {
        self.set_level(Level::Low)
    }

    /// Invert the cached logical level and write it
    pub fn toggle(&mut self) -> Result<(), Error> {
        self.set_level(!self.level)
    }
}

impl<D> embedded_hal::digital::ErrorType for Output<'_, D> {
    type Error = Error;
}

impl<D: PinDriver> embedded_hal::digital::OutputPin for Output<'_, D> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.off()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.on()
    }
}

impl<D: PinDriver> embedded_hal::digital::StatefulOutputPin for Output<'_, D> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.is_high())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.is_high())
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Output::toggle(self)
    }
}
