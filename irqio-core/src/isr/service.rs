//! Interrupt service install gate
//!
//! The vendor's per-pin interrupt dispatch service is installed once per
//! process, lazily, by whichever pin arms an interrupt first.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use irqio_hal::PinDriver;

use crate::error::Error;

/// Shared install flag for the pin interrupt service
///
/// The flag only ever moves from false to true. It is guarded by a
/// blocking mutex rather than an interrupt critical section because the
/// install call itself may block: `M` must be a `RawMutex` backed by an
/// RTOS mutex, never `CriticalSectionRawMutex`.
pub struct IsrService<M: RawMutex> {
    installed: Mutex<M, Cell<bool>>,
}

impl<M: RawMutex> Default for IsrService<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> IsrService<M> {
    /// Create a gate with the service not yet installed
    pub const fn new() -> Self {
        Self {
            installed: Mutex::new(Cell::new(false)),
        }
    }

    /// Check whether the service has been installed
    pub fn is_installed(&self) -> bool {
        self.installed.lock(|installed| installed.get())
    }

    /// Install the service unless already installed
    ///
    /// Idempotent. On failure the flag stays false and the driver error is
    /// returned as [`Error::Installation`].
    pub fn ensure_installed<D: PinDriver>(&self, driver: &D) -> Result<(), Error> {
        self.installed
            .lock(|installed| install_locked(installed, driver))
    }

    /// Install if needed, then run `arm` under the same lock
    ///
    /// Used for the trigger-set and handler-attach steps so that two tasks
    /// arming different pins for the first time cannot interleave.
    pub fn arm<D, F>(&self, driver: &D, arm: F) -> Result<(), Error>
    where
        D: PinDriver,
        F: FnOnce() -> Result<(), Error>,
    {
        self.installed.lock(|installed| {
            install_locked(installed, driver)?;
            arm()
        })
    }
}

fn install_locked<D: PinDriver>(installed: &Cell<bool>, driver: &D) -> Result<(), Error> {
    if installed.get() {
        return Ok(());
    }

    driver.install_isr_service().map_err(|e| {
        #[cfg(feature = "defmt")]
        defmt::warn!("GPIO ISR service install failed: {}", e);
        Error::Installation(e)
    })?;
    installed.set(true);

    #[cfg(feature = "defmt")]
    defmt::info!("GPIO ISR service installed");

    Ok(())
}
