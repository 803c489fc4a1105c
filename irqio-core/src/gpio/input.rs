//! Input pins
//!
//! [`Input`] reads logical levels. [`InterruptInput`] adds interrupt arming
//! and the handler registration setters; it owns a `'static`
//! [`InterruptContext`] for as long as it lives.

use core::convert::Infallible;
use core::ops::{Deref, DerefMut};

use embassy_sync::blocking_mutex::raw::RawMutex;
use irqio_hal::{EventLoop, InterruptQueue, Level, PinDriver, Pull, Trigger};

use super::{Gpio, PinBase};
use crate::error::Error;
use crate::isr::{release, InterruptContext, LoopTarget, RegistrationKind};

/// Digital input with active-low handling
pub struct Input<'d, D, E, M>
where
    E: EventLoop + 'static,
    M: RawMutex,
{
    gpio: &'d Gpio<D, E, M>,
    base: PinBase,
    pull: Pull,
}

impl<'d, D, E, M> Input<'d, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    pub(super) fn new(gpio: &'d Gpio<D, E, M>, base: PinBase, pull: Pull) -> Self {
        Self { gpio, base, pull }
    }

    /// Pin number
    pub fn pin(&self) -> u8 {
        self.base.pin()
    }

    /// Whether the input is active-low
    pub fn active_low(&self) -> bool {
        self.base.active_low()
    }

    /// Current pull resistor setting
    pub fn pull(&self) -> Pull {
        self.pull
    }

    /// Read the logical level
    ///
    /// The physical level is inverted for active-low inputs.
    pub fn read(&self) -> Level {
        self.gpio
            .driver()
            .get_level(self.base.pin())
            .inverted_if(self.base.active_low())
    }

    /// Check if the input is in its asserted state
    pub fn is_active(&self) -> bool {
        self.read().is_high()
    }

    /// Change the pull resistors
    pub fn set_pull(&mut self, pull: Pull) -> Result<(), Error> {
        self.gpio
            .driver()
            .set_pull(self.base.pin(), pull)
            .map_err(Error::Configuration)?;
        self.pull = pull;
        Ok(())
    }

    /// Enable the internal pull-up
    pub fn enable_pullup(&mut self) -> Result<(), Error> {
        self.set_pull(Pull::Up)
    }

    /// Disable the internal pull-up (pin floats)
    pub fn disable_pullup(&mut self) -> Result<(), Error> {
        self.set_pull(Pull::None)
    }

    /// Enable the internal pull-down
    pub fn enable_pulldown(&mut self) -> Result<(), Error> {
        self.set_pull(Pull::Down)
    }

    /// Disable the internal pull-down (pin floats)
    pub fn disable_pulldown(&mut self) -> Result<(), Error> {
        self.set_pull(Pull::None)
    }

    /// Enable pull-up and pull-down together
    pub fn enable_pullup_pulldown(&mut self) -> Result<(), Error> {
        self.set_pull(Pull::UpDown)
    }

    /// Disable both pulls (pin floats)
    pub fn disable_pullup_pulldown(&mut self) -> Result<(), Error> {
        self.set_pull(Pull::None)
    }

    /// Bind an interrupt context to this input
    ///
    /// Fails with `Configuration(InvalidState)` if the context is still
    /// bound to another live pin.
    pub fn into_interrupt(
        self,
        context: &'static InterruptContext<E>,
    ) -> Result<InterruptInput<'d, D, E, M>, Error> {
        context.bind(self.base.pin())?;
        Ok(InterruptInput {
            input: self,
            context,
            trigger: Trigger::Disabled,
        })
    }
}

impl<D, E, M> embedded_hal::digital::ErrorType for Input<'_, D, E, M>
where
    E: EventLoop + 'static,
    M: RawMutex,
{
    type Error = Infallible;
}

impl<D, E, M> embedded_hal::digital::InputPin for Input<'_, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read().is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.read().is_high())
    }
}

/// Input with interrupt delivery
///
/// Dereferences to [`Input`] for reads and pull configuration. At most one
/// delivery mechanism is registered at a time: each setter replaces the
/// previous one.
pub struct InterruptInput<'d, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    input: Input<'d, D, E, M>,
    context: &'static InterruptContext<E>,
    trigger: Trigger,
}

impl<'d, D, E, M> InterruptInput<'d, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    /// Context handed to the interrupt vector
    pub fn context(&self) -> &'static InterruptContext<E> {
        self.context
    }

    /// Logical trigger last passed to [`InterruptInput::enable_interrupt`]
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Check whether the interrupt is armed
    pub fn is_armed(&self) -> bool {
        self.context.is_armed()
    }

    /// Active delivery mechanism
    pub fn registration(&self) -> RegistrationKind {
        self.context.registration()
    }

    /// Arm the interrupt for a logical trigger
    ///
    /// Active-low inputs swap rising/falling and high/low level so the
    /// hardware fires on the physical transition matching the logical one.
    /// Installs the shared interrupt service on first use. On error the
    /// interrupt is not armed (even if it was before) and the whole call
    /// may be retried.
    pub fn enable_interrupt(&mut self, trigger: Trigger) -> Result<(), Error> {
        let pin = self.input.pin();
        let physical = trigger.physical(self.input.active_low());
        let gpio = self.input.gpio;
        let driver = gpio.driver();
        let context = self.context;

        let armed = gpio.service().arm(driver, || {
            driver
                .set_trigger(pin, physical)
                .map_err(Error::Configuration)?;
            context.arm();
            driver.attach_isr(pin, context).map_err(Error::Configuration)?;
            context.set_attached(true);
            Ok(())
        });
        if let Err(e) = armed {
            context.disarm();
            self.trigger = Trigger::Disabled;
            // A failed re-arm must not leave the previous attachment behind
            if context.is_attached() {
                let _ = self.teardown();
            }
            return Err(e);
        }
        self.trigger = trigger;

        #[cfg(feature = "defmt")]
        defmt::debug!("Pin {} armed: {} (physical {})", pin, trigger, physical);

        Ok(())
    }

    /// Disarm the interrupt
    ///
    /// The tag is cleared first, so an interrupt already in flight is
    /// absorbed. The handler is detached even if disabling the trigger
    /// fails; the first error is returned. The registration is kept.
    pub fn disable_interrupt(&mut self) -> Result<(), Error> {
        self.teardown()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Pin {} disarmed", self.input.pin());

        Ok(())
    }

    fn teardown(&mut self) -> Result<(), Error> {
        let pin = self.input.pin();
        let driver = self.input.gpio.driver();

        self.context.disarm();
        self.trigger = Trigger::Disabled;

        let trigger = driver
            .set_trigger(pin, Trigger::Disabled)
            .map_err(Error::Configuration);
        let detach = if self.context.is_attached() {
            driver
                .detach_isr(pin)
                .map_err(Error::Configuration)
                .map(|()| self.context.set_attached(false))
        } else {
            Ok(())
        };
        trigger.and(detach)
    }

    /// Deliver interrupts to a handler on the port's default event loop
    ///
    /// The event base is [`crate::isr::INPUT_EVENTS`] and the event id is
    /// the pin number. Interrupts arriving while the previous mechanism is
    /// being replaced see `Unregistered` and are absorbed.
    pub fn set_event_handler(&mut self, handler: E::Handler) -> Result<(), Error> {
        let default_loop = self.input.gpio.default_loop();
        self.context
            .register_event_handler(LoopTarget::Default, default_loop, handler)
    }

    /// Deliver interrupts to a handler on an application event loop
    ///
    /// Interrupts arriving while the previous mechanism is being replaced
    /// see `Unregistered` and are absorbed.
    pub fn set_loop_event_handler(
        &mut self,
        event_loop: &'static E,
        handler: E::Handler,
    ) -> Result<(), Error> {
        self.context
            .register_event_handler(LoopTarget::Custom, event_loop, handler)
    }

    /// Deliver interrupts by pushing the pin number onto a queue
    ///
    /// Assigning the queue cannot fail; an error can only come from
    /// unregistering a previously registered event handler, in which case
    /// nothing is registered afterwards. Interrupts arriving during the
    /// switch see `Unregistered` and are absorbed.
    pub fn set_queue(&mut self, queue: &'static dyn InterruptQueue) -> Result<(), Error> {
        self.context.register_queue(queue)
    }

    /// Remove whichever delivery mechanism is registered
    pub fn clear_handlers(&mut self) -> Result<(), Error> {
        self.context.clear_active_registration()
    }
}

impl<'d, D, E, M> Deref for InterruptInput<'d, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    type Target = Input<'d, D, E, M>;

    fn deref(&self) -> &Self::Target {
        &self.input
    }
}

impl<D, E, M> DerefMut for InterruptInput<'_, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.input
    }
}

impl<D, E, M> Drop for InterruptInput<'_, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    fn drop(&mut self) {
        let pin = self.input.pin();

        if self.context.is_armed() || self.context.is_attached() {
            if let Err(_e) = self.teardown() {
                // Still attached: the context stays unbindable
                #[cfg(feature = "defmt")]
                defmt::warn!("Pin {} not fully disarmed on drop: {}", pin, _e);
            }
        }

        if let Err(_e) = release(self.context.unbind(), u32::from(pin)) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Pin {} handler not unregistered on drop: {}", pin, _e);
        }
    }
}

impl<D, E, M> embedded_hal::digital::ErrorType for InterruptInput<'_, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    type Error = Infallible;
}

impl<D, E, M> embedded_hal::digital::InputPin for InterruptInput<'_, D, E, M>
where
    D: PinDriver,
    E: EventLoop + 'static,
    M: RawMutex,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.input.read().is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.input.read().is_high())
    }
}
