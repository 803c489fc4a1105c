//! I2C register access
//!
//! Most I2C peripherals expose a register file addressed by a one-byte
//! register pointer. [`RegisterBus`] wraps an installed master bus and
//! issues the usual transactions:
//!
//! ```text
//! read:  START addr+W reg RESTART addr+R data.. STOP
//! write: START addr+W reg data.. STOP
//! ```

use embedded_hal::i2c::{I2c, Operation};
use irqio_hal::{I2cBusError, I2cConfig, I2cDriver};

use crate::error::Error;

/// Register-oriented access to an I2C master bus
pub struct RegisterBus<B> {
    bus: B,
}

impl<B: I2c> RegisterBus<B> {
    /// Wrap an already installed bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Install the master driver on `port` and wrap the resulting bus
    pub fn init_master<D>(driver: &mut D, port: u8, config: &I2cConfig) -> Result<Self, Error>
    where
        D: I2cDriver<Bus = B>,
    {
        let bus = driver.install(port, config).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("I2C{} master install failed: {}", port, e);
            Error::Configuration(e)
        })?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "I2C{} master on SDA {} / SCL {} at {} Hz",
            port,
            config.sda,
            config.scl,
            config.frequency
        );

        Ok(Self::new(bus))
    }

    /// Read one register
    pub fn read_register(&mut self, address: u8, register: u8) -> Result<u8, Error> {
        let mut value = [0u8; 1];
        self.read_registers(address, register, &mut value)?;
        Ok(value[0])
    }

    /// Write one register
    pub fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Error> {
        self.write_registers(address, register, &[value])
    }

    /// Read consecutive registers starting at `register`
    pub fn read_registers(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error> {
        self.bus
            .write_read(address, &[register], buf)
            .map_err(transport)
    }

    /// Write consecutive registers starting at `register`
    ///
    /// The register byte and the data go out in a single transaction with
    /// no restart between them.
    pub fn write_registers(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), Error> {
        let pointer = [register];
        let mut ops = [Operation::Write(&pointer), Operation::Write(data)];
        self.bus.transaction(address, &mut ops).map_err(transport)
    }

    /// Direct access to the bus for non-register transfers
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }
}

fn transport<E: embedded_hal::i2c::Error>(error: E) -> Error {
    Error::Transport(I2cBusError::classify(&error))
}
