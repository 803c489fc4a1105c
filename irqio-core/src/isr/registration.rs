//! Handler registration discipline
//!
//! Every setter first clears whatever mechanism is active, then installs
//! the new one. The record moves old → `Unregistered` → new, each step in
//! its own critical section, so the dispatcher never observes a mixture.
//! Event-loop calls (which may block) happen between those steps, outside
//! any critical section.

use irqio_hal::EventLoop;

use super::context::{InterruptContext, Registration, INPUT_EVENTS};
use crate::error::Error;

/// Which event loop a handler is registered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum LoopTarget {
    Default,
    Custom,
}

impl<E: EventLoop + 'static> InterruptContext<E> {
    /// Remove the active delivery mechanism
    ///
    /// The record is `Unregistered` afterwards even when unregistering the
    /// previous handler fails; the error is returned so the caller aborts.
    pub(crate) fn clear_active_registration(&self) -> Result<(), Error> {
        let id = u32::from(self.pin());
        release(self.take_registration(), id)
    }

    /// Replace the active mechanism with an event-loop handler
    ///
    /// `Unregistered` is briefly visible to the dispatcher; interrupts in
    /// that window are absorbed.
    pub(crate) fn register_event_handler(
        &self,
        target: LoopTarget,
        event_loop: &'static E,
        handler: E::Handler,
    ) -> Result<(), Error> {
        self.clear_active_registration()?;

        let id = u32::from(self.pin());
        let instance = event_loop
            .register(INPUT_EVENTS, id, handler)
            .map_err(|e| {
                #[cfg(feature = "defmt")]
                defmt::warn!("Pin {} handler registration failed: {}", id, e);
                Error::Registration(e)
            })?;

        let registration = match target {
            LoopTarget::Default => Registration::Default {
                event_loop,
                instance,
            },
            LoopTarget::Custom => Registration::Custom {
                event_loop,
                instance,
            },
        };
        self.store_registration(registration);

        #[cfg(feature = "defmt")]
        defmt::debug!("Pin {} delivering to {:?} event loop", id, target);

        Ok(())
    }

    /// Replace the active mechanism with a queue target
    ///
    /// `Unregistered` is briefly visible to the dispatcher, as above.
    pub(crate) fn register_queue(
        &self,
        queue: &'static dyn irqio_hal::InterruptQueue,
    ) -> Result<(), Error> {
        self.clear_active_registration()?;
        self.store_registration(Registration::Queue(queue));

        #[cfg(feature = "defmt")]
        defmt::debug!("Pin {} delivering to queue", self.pin());

        Ok(())
    }
}

/// Undo a registration that has already been taken out of its context
pub(crate) fn release<E: EventLoop + 'static>(
    registration: Registration<E>,
    id: u32,
) -> Result<(), Error> {
    match registration {
        Registration::Default {
            event_loop,
            instance,
        }
        | Registration::Custom {
            event_loop,
            instance,
        } => event_loop
            .unregister(INPUT_EVENTS, id, instance)
            .map_err(Error::Registration),
        Registration::Queue(_) | Registration::Unregistered => Ok(()),
    }
}
