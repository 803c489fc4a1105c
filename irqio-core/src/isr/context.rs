//! Interrupt context and dispatcher
//!
//! An [`InterruptContext`] is the argument the interrupt vector receives
//! for an armed pin. It lives in `'static` storage, which is what keeps it
//! valid for as long as the interrupt may fire, and it carries:
//!
//! - a type tag, written when the pin is armed and cleared when it is
//!   disarmed or its owner goes away, so a late interrupt delivered with a
//!   stale context is absorbed;
//! - the pin number;
//! - the handler registration record, guarded by a critical section.
//!
//! ```text
//! hardware ──► vector ──► InterruptContext::dispatch
//!                               │ tag ok?
//!                               ▼
//!                 Queue ──► send_from_isr(pin)
//!                 Custom ─► loop.post_from_isr(INPUT_EVENTS, pin)
//!                 Default ► loop.post_from_isr(INPUT_EVENTS, pin)
//!                 Unregistered ─► absorbed
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use irqio_hal::{EventBase, EventLoop, HalError, InterruptHandler, InterruptQueue};

use crate::error::Error;

/// Event base used for all pin events; the event id is the pin number
pub const INPUT_EVENTS: EventBase = EventBase("INPUT_EVENTS");

/// Tag value of an armed context ("GPIO")
pub const CONTEXT_TAG: u32 = 0x4750_494F;

const NO_TAG: u32 = 0;

/// Active delivery mechanism for a pin's interrupts
///
/// A sum type, so at most one mechanism is live at any time.
pub enum Registration<E: EventLoop + 'static> {
    /// Nothing registered; interrupts are absorbed
    Unregistered,
    /// Handler registered on the port's default event loop
    Default {
        event_loop: &'static E,
        instance: E::Instance,
    },
    /// Handler registered on an application-supplied event loop
    Custom {
        event_loop: &'static E,
        instance: E::Instance,
    },
    /// Pin numbers are pushed onto a queue
    Queue(&'static dyn InterruptQueue),
}

impl<E: EventLoop + 'static> Registration<E> {
    /// Which mechanism this record holds
    pub fn kind(&self) -> RegistrationKind {
        match self {
            Registration::Unregistered => RegistrationKind::Unregistered,
            Registration::Default { .. } => RegistrationKind::DefaultLoop,
            Registration::Custom { .. } => RegistrationKind::CustomLoop,
            Registration::Queue(_) => RegistrationKind::Queue,
        }
    }
}

/// Payload-free view of a [`Registration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationKind {
    /// Nothing registered
    Unregistered,
    /// Default event loop handler
    DefaultLoop,
    /// Custom event loop handler
    CustomLoop,
    /// Queue target
    Queue,
}

struct Slot<E: EventLoop + 'static> {
    pin: u8,
    bound: bool,
    // Vector still holds this context for `pin`
    attached: bool,
    registration: Registration<E>,
}

/// Per-pin interrupt context handed to the interrupt vector
///
/// Create one per interrupt-capable pin in static storage:
///
/// ```ignore
/// static BUTTON_IRQ: InterruptContext<PlatformLoop> = InterruptContext::new();
/// ```
///
/// A context is bound to at most one live pin at a time, and cannot be
/// bound again while the vector of its previous pin still references it.
pub struct InterruptContext<E: EventLoop + 'static> {
    tag: AtomicU32,
    slot: Mutex<CriticalSectionRawMutex, RefCell<Slot<E>>>,
}

impl<E: EventLoop + 'static> Default for InterruptContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EventLoop + 'static> InterruptContext<E> {
    /// Create an unbound, unarmed context
    pub const fn new() -> Self {
        Self {
            tag: AtomicU32::new(NO_TAG),
            slot: Mutex::new(RefCell::new(Slot {
                pin: 0,
                bound: false,
                attached: false,
                registration: Registration::Unregistered,
            })),
        }
    }

    /// Check whether the context currently carries the armed tag
    pub fn is_armed(&self) -> bool {
        self.tag.load(Ordering::Acquire) == CONTEXT_TAG
    }

    /// Check whether a pin currently owns this context
    pub fn is_bound(&self) -> bool {
        self.slot.lock(|slot| slot.borrow().bound)
    }

    /// Check whether a pin vector still references this context
    pub fn is_attached(&self) -> bool {
        self.slot.lock(|slot| slot.borrow().attached)
    }

    /// Pin number the context was last bound to
    pub fn pin(&self) -> u8 {
        self.slot.lock(|slot| slot.borrow().pin)
    }

    /// Currently active delivery mechanism
    pub fn registration(&self) -> RegistrationKind {
        self.slot.lock(|slot| slot.borrow().registration.kind())
    }

    /// Forward one interrupt to the active delivery mechanism
    ///
    /// Runs in interrupt context: no blocking, no allocation, no blocking
    /// locks, errors are dropped. Never modifies the registration.
    pub fn dispatch(&self) {
        if self.tag.load(Ordering::Acquire) != CONTEXT_TAG {
            return;
        }

        self.slot.lock(|slot| {
            // A writer holds the borrow only inside its own critical section
            let Ok(slot) = slot.try_borrow() else {
                return;
            };
            let id = u32::from(slot.pin);

            // Queue first: it is the low-latency path
            match &slot.registration {
                Registration::Queue(queue) => {
                    // Full queue drops the notification
                    let _ = queue.send_from_isr(slot.pin);
                }
                Registration::Custom { event_loop, .. } => {
                    let _ = event_loop.post_from_isr(INPUT_EVENTS, id);
                }
                Registration::Default { event_loop, .. } => {
                    let _ = event_loop.post_from_isr(INPUT_EVENTS, id);
                }
                Registration::Unregistered => {}
            }
        });
    }

    /// Claim the context for `pin`
    ///
    /// Refused while bound, and while still attached to the previous pin's
    /// vector: that vector would otherwise deliver as the new pin.
    pub(crate) fn bind(&self, pin: u8) -> Result<(), Error> {
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.bound || slot.attached {
                return Err(Error::Configuration(HalError::InvalidState));
            }
            slot.bound = true;
            slot.pin = pin;
            slot.registration = Registration::Unregistered;
            Ok(())
        })
    }

    /// Release the context, handing back whatever was still registered
    ///
    /// The attached flag is left as is.
    pub(crate) fn unbind(&self) -> Registration<E> {
        self.disarm();
        self.slot.lock(|slot| {
            let mut slot = slot.borrow_mut();
            slot.bound = false;
            core::mem::replace(&mut slot.registration, Registration::Unregistered)
        })
    }

    pub(crate) fn arm(&self) {
        self.tag.store(CONTEXT_TAG, Ordering::Release);
    }

    pub(crate) fn disarm(&self) {
        self.tag.store(NO_TAG, Ordering::Release);
    }

    pub(crate) fn set_attached(&self, attached: bool) {
        self.slot.lock(|slot| slot.borrow_mut().attached = attached);
    }

    /// Swap the record for `Unregistered` in one critical section
    pub(crate) fn take_registration(&self) -> Registration<E> {
        self.slot.lock(|slot| {
            core::mem::replace(&mut slot.borrow_mut().registration, Registration::Unregistered)
        })
    }

    /// Install a new record in one critical section
    ///
    /// Callers clear the previous record first; see
    /// [`InterruptContext::take_registration`].
    pub(crate) fn store_registration(&self, registration: Registration<E>) {
        self.slot.lock(|slot| {
            slot.borrow_mut().registration = registration;
        });
    }
}

impl<E: EventLoop + 'static> InterruptHandler for InterruptContext<E> {
    fn on_interrupt(&self) {
        self.dispatch();
    }
}
