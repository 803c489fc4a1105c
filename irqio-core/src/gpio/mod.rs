//! GPIO port and pin objects
//!
//! [`Gpio`] owns the pin driver, the shared interrupt-service gate and a
//! reference to the default event loop. Pins borrow the port:
//!
//! - [`Input`] - logical reads, pull resistors
//! - [`InterruptInput`] - an [`Input`] bound to an interrupt context
//! - [`Output`] - logical writes with a cached level
//!
//! All three hold a [`PinBase`] by composition and apply its active-low
//! flag to every level and trigger that crosses into the driver.

mod input;
mod output;

pub use input::{Input, InterruptInput};
pub use output::Output;

use embassy_sync::blocking_mutex::raw::RawMutex;
use irqio_hal::{EventLoop, HalError, PinConfig, PinDriver, Pull, GPIO_COUNT};

use crate::config::PinSpec;
use crate::error::Error;
use crate::isr::IsrService;

/// Pin number and polarity shared by every pin type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinBase {
    pin: u8,
    active_low: bool,
}

impl PinBase {
    /// Validate the pin number
    pub fn new(pin: u8, active_low: bool) -> Result<Self, Error> {
        if pin >= GPIO_COUNT {
            return Err(Error::Configuration(HalError::InvalidArg));
        }
        Ok(Self { pin, active_low })
    }

    /// Pin number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Whether the asserted state is the physical low level
    pub fn active_low(&self) -> bool {
        self.active_low
    }
}

/// GPIO port: driver, install gate and default event loop
///
/// Create one per process and share it by reference. `M` is the lock
/// guarding interrupt-service installation. Installation may block, so it
/// must be a blocking (RTOS) mutex, not an interrupt critical section.
pub struct Gpio<D, E, M>
where
    E: EventLoop + 'static,
    M: RawMutex,
{
    driver: D,
    service: IsrService<M>,
    default_loop: &'static E,
}

impl<D, E, M> Gpio<D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    /// Create a port around a driver and the platform's default loop
    pub const fn new(driver: D, default_loop: &'static E) -> Self {
        Self {
            driver,
            service: IsrService::new(),
            default_loop,
        }
    }

    /// Underlying pin driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Interrupt-service install gate
    pub fn service(&self) -> &IsrService<M> {
        &self.service
    }

    /// Loop used by [`InterruptInput::set_event_handler`]
    pub fn default_loop(&self) -> &'static E {
        self.default_loop
    }

    /// Configure an input with explicit polarity and pulls
    pub fn input_with(
        &self,
        pin: u8,
        active_low: bool,
        pull: Pull,
    ) -> Result<Input<'_, D, E, M>, Error> {
        let base = PinBase::new(pin, active_low)?;
        let mut config = PinConfig::input(pin);
        config.pull = pull;
        self.driver
            .configure(&config)
            .map_err(Error::Configuration)?;
        Ok(Input::new(self, base, pull))
    }

    /// Active-high floating input
    pub fn input(&self, pin: u8) -> Result<Input<'_, D, E, M>, Error> {
        self.input_with(pin, false, Pull::None)
    }

    /// Active-low floating input
    pub fn input_active_low(&self, pin: u8) -> Result<Input<'_, D, E, M>, Error> {
        self.input_with(pin, true, Pull::None)
    }

    /// Input described by a pin string from configuration
    pub fn input_from_spec(&self, spec: &PinSpec) -> Result<Input<'_, D, E, M>, Error> {
        self.input_with(spec.pin, spec.active_low, spec.pull)
    }

    /// Configure an output with explicit polarity
    pub fn output_with(&self, pin: u8, active_low: bool) -> Result<Output<'_, D>, Error> {
        let base = PinBase::new(pin, active_low)?;
        self.driver
            .configure(&PinConfig::output(pin))
            .map_err(Error::Configuration)?;
        Ok(Output::new(&self.driver, base))
    }

    /// Active-high output
    pub fn output(&self, pin: u8) -> Result<Output<'_, D>, Error> {
        self.output_with(pin, false)
    }

    /// Active-low output
    pub fn output_active_low(&self, pin: u8) -> Result<Output<'_, D>, Error> {
        self.output_with(pin, true)
    }

    /// Output described by a pin string from configuration
    ///
    /// Pull flags in the spec are ignored; outputs are configured without
    /// pull resistors.
    pub fn output_from_spec(&self, spec: &PinSpec) -> Result<Output<'_, D>, Error> {
        self.output_with(spec.pin, spec.active_low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_pin_spec;
    use crate::mock::{leak, MockDriver, MockGpio, MockLoop};
    use irqio_hal::{Mode, Trigger};

    fn port() -> MockGpio {
        Gpio::new(MockDriver::new(), leak(MockLoop::new()))
    }

    #[test]
    fn test_input_configuration() {
        let gpio = port();
        let input = gpio.input_with(6, true, Pull::Up).unwrap();

        assert_eq!(input.pin(), 6);
        assert!(input.active_low());
        assert_eq!(
            gpio.driver().configs(),
            vec![PinConfig {
                pin: 6,
                mode: Mode::Input,
                pull: Pull::Up,
                trigger: Trigger::Disabled,
            }]
        );
    }

    #[test]
    fn test_output_configuration() {
        let gpio = port();
        let output = gpio.output_active_low(5).unwrap();

        assert_eq!(output.pin(), 5);
        assert_eq!(gpio.driver().configs(), vec![PinConfig::output(5)]);
        // No write until the application sets a level
        assert!(gpio.driver().writes().is_empty());
    }

    #[test]
    fn test_invalid_pin_rejected() {
        let gpio = port();

        assert_eq!(
            gpio.input(64).err(),
            Some(Error::Configuration(HalError::InvalidArg))
        );
        assert!(gpio.driver().configs().is_empty());
    }

    #[test]
    fn test_driver_rejection() {
        let gpio = port();
        gpio.driver().fail_next_configure(HalError::InvalidArg);

        assert_eq!(
            gpio.output(3).err(),
            Some(Error::Configuration(HalError::InvalidArg))
        );
    }

    #[test]
    fn test_from_spec() {
        let gpio = port();
        let spec = parse_pin_spec("!^gpio12").unwrap();

        let input = gpio.input_from_spec(&spec).unwrap();
        assert_eq!(input.pin(), 12);
        assert!(input.active_low());
        assert_eq!(input.pull(), Pull::Up);

        let output = gpio.output_from_spec(&parse_pin_spec("!gpio2").unwrap()).unwrap();
        assert_eq!(gpio.driver().configs()[1], PinConfig::output(2));
        assert!(output.active_low());
    }
}
