//! Event loop abstractions
//!
//! An event loop decouples an interrupt-context notification from the
//! task that handles it. Handlers are registered per (base, id) pair and
//! events are posted either from task context or, with the `_from_isr`
//! variant, from an interrupt.

use crate::error::HalError;

/// Namespace for a family of event ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventBase(pub &'static str);

impl EventBase {
    /// Name of the base
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

/// Event publishing capability
///
/// Both the platform's default loop and application-created loops
/// implement this trait. The trait requires `Sync` because a loop is
/// shared with interrupt context through `'static` references.
pub trait EventLoop: Sync {
    /// Handler callback accepted by [`EventLoop::register`]
    type Handler: Copy;

    /// Registration handle returned by [`EventLoop::register`]
    ///
    /// Needed to unregister exactly that handler later.
    type Instance: Send;

    /// Register a handler for `(base, id)`
    fn register(
        &self,
        base: EventBase,
        id: u32,
        handler: Self::Handler,
    ) -> Result<Self::Instance, HalError>;

    /// Remove a handler previously returned by [`EventLoop::register`]
    fn unregister(&self, base: EventBase, id: u32, instance: Self::Instance)
        -> Result<(), HalError>;

    /// Post an event from task context
    fn post(&self, base: EventBase, id: u32) -> Result<(), HalError>;

    /// Post an event from interrupt context
    ///
    /// Must not block. Delivery is best effort.
    fn post_from_isr(&self, base: EventBase, id: u32) -> Result<(), HalError>;
}
