//! Interrupt-safe queue abstractions
//!
//! A queue target receives the number of the pin that fired. Sending
//! happens in interrupt context, so it must never block: a full queue
//! drops the notification.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

/// Queue that accepts pin numbers from interrupt context
pub trait InterruptQueue: Sync {
    /// Try to push a pin number
    ///
    /// Returns `false` if the queue was full and the value was dropped.
    fn send_from_isr(&self, pin: u8) -> bool;
}

impl<M, const N: usize> InterruptQueue for Channel<M, u8, N>
where
    M: RawMutex + Sync,
{
    fn send_from_isr(&self, pin: u8) -> bool {
        self.try_send(pin).is_ok()
    }
}

// Lock-free, only built where compare-and-swap exists
#[cfg(target_has_atomic = "8")]
impl<const N: usize> InterruptQueue for heapless::mpmc::MpMcQueue<u8, N> {
    fn send_from_isr(&self, pin: u8) -> bool {
        self.enqueue(pin).is_ok()
    }
}
