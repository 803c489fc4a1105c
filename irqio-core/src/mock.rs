//! Mock capabilities for host tests

use std::boxed::Box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use irqio_hal::{
    EventBase, EventLoop, HalError, I2cConfig, I2cDriver, InterruptHandler, Level, PinConfig,
    PinDriver, Pull, Trigger,
};

use crate::gpio::Gpio;
use crate::isr::{InterruptContext, RegistrationKind};

/// Port type used throughout the tests
pub type MockGpio = Gpio<MockDriver, MockLoop, StdRawMutex>;

/// Blocking mutex standing in for an RTOS mutex
///
/// Unlike `CriticalSectionRawMutex` it leaves the critical section free
/// while held.
pub struct StdRawMutex(Mutex<()>);

#[allow(unsafe_code)]
// SAFETY: `lock` holds the std mutex for the whole closure, so at most
// one closure runs at a time.
unsafe impl RawMutex for StdRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = StdRawMutex(Mutex::new(()));

    fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.0.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }
}

/// Give a test value `'static` lifetime
pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

/// Handler function accepted by [`MockLoop`]
pub fn handler(_base: EventBase, _id: u32) {}

struct DriverState {
    levels: [bool; 64],
    configs: Vec<PinConfig>,
    writes: Vec<(u8, Level)>,
    pulls: Vec<(u8, Pull)>,
    triggers: Vec<(u8, Trigger)>,
    handlers: Vec<(u8, &'static dyn InterruptHandler)>,
    detached: Vec<u8>,
    fail_install: Option<HalError>,
    fail_configure: Option<HalError>,
    fail_attach: Option<HalError>,
    fail_detach: Option<HalError>,
    fail_trigger: Option<HalError>,
}

impl Default for DriverState {
    fn default() -> Self {
        Self {
            levels: [false; 64],
            configs: Vec::new(),
            writes: Vec::new(),
            pulls: Vec::new(),
            triggers: Vec::new(),
            handlers: Vec::new(),
            detached: Vec::new(),
            fail_install: None,
            fail_configure: None,
            fail_attach: None,
            fail_detach: None,
            fail_trigger: None,
        }
    }
}

/// Pin driver recording every call
pub struct MockDriver {
    state: Mutex<DriverState>,
    install_calls: AtomicUsize,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DriverState::default()),
            install_calls: AtomicUsize::new(0),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut DriverState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn install_calls(&self) -> usize {
        self.install_calls.load(Ordering::SeqCst)
    }

    pub fn fail_next_install(&self, error: HalError) {
        self.with(|s| s.fail_install = Some(error));
    }

    pub fn fail_next_configure(&self, error: HalError) {
        self.with(|s| s.fail_configure = Some(error));
    }

    pub fn fail_next_attach(&self, error: HalError) {
        self.with(|s| s.fail_attach = Some(error));
    }

    pub fn fail_next_trigger(&self, error: HalError) {
        self.with(|s| s.fail_trigger = Some(error));
    }

    pub fn fail_next_detach(&self, error: HalError) {
        self.with(|s| s.fail_detach = Some(error));
    }

    /// Drive the physical level seen by `get_level`
    pub fn set_input(&self, pin: u8, level: Level) {
        self.with(|s| s.levels[pin as usize] = level.is_high());
    }

    pub fn configs(&self) -> Vec<PinConfig> {
        self.with(|s| s.configs.clone())
    }

    pub fn writes(&self) -> Vec<(u8, Level)> {
        self.with(|s| s.writes.clone())
    }

    pub fn pulls(&self) -> Vec<(u8, Pull)> {
        self.with(|s| s.pulls.clone())
    }

    pub fn triggers(&self) -> Vec<(u8, Trigger)> {
        self.with(|s| s.triggers.clone())
    }

    pub fn last_trigger(&self, pin: u8) -> Option<Trigger> {
        self.with(|s| {
            s.triggers
                .iter()
                .rev()
                .find(|(p, _)| *p == pin)
                .map(|(_, t)| *t)
        })
    }

    pub fn is_attached(&self, pin: u8) -> bool {
        self.with(|s| s.handlers.iter().any(|(p, _)| *p == pin))
    }

    pub fn detached(&self) -> Vec<u8> {
        self.with(|s| s.detached.clone())
    }

    /// Simulate the hardware vector firing for `pin`
    pub fn fire(&self, pin: u8) {
        let handler = self.with(|s| {
            s.handlers
                .iter()
                .find(|(p, _)| *p == pin)
                .map(|(_, h)| *h)
        });
        if let Some(handler) = handler {
            handler.on_interrupt();
        }
    }
}

impl PinDriver for MockDriver {
    fn configure(&self, config: &PinConfig) -> Result<(), HalError> {
        self.with(|s| {
            if let Some(e) = s.fail_configure.take() {
                return Err(e);
            }
            s.configs.push(*config);
            Ok(())
        })
    }

    fn set_level(&self, pin: u8, level: Level) -> Result<(), HalError> {
        self.with(|s| {
            s.levels[pin as usize] = level.is_high();
            s.writes.push((pin, level));
        });
        Ok(())
    }

    fn get_level(&self, pin: u8) -> Level {
        self.with(|s| Level::from(s.levels[pin as usize]))
    }

    fn set_pull(&self, pin: u8, pull: Pull) -> Result<(), HalError> {
        self.with(|s| s.pulls.push((pin, pull)));
        Ok(())
    }

    fn set_trigger(&self, pin: u8, trigger: Trigger) -> Result<(), HalError> {
        self.with(|s| {
            if let Some(e) = s.fail_trigger.take() {
                return Err(e);
            }
            s.triggers.push((pin, trigger));
            Ok(())
        })
    }

    fn install_isr_service(&self) -> Result<(), HalError> {
        self.install_calls.fetch_add(1, Ordering::SeqCst);
        // Widen the race window for concurrent callers
        std::thread::yield_now();
        self.with(|s| match s.fail_install.take() {
            Some(e) => Err(e),
            None => Ok(()),
        })
    }

    fn attach_isr(&self, pin: u8, handler: &'static dyn InterruptHandler) -> Result<(), HalError> {
        self.with(|s| {
            if let Some(e) = s.fail_attach.take() {
                return Err(e);
            }
            s.handlers.retain(|(p, _)| *p != pin);
            s.handlers.push((pin, handler));
            Ok(())
        })
    }

    fn detach_isr(&self, pin: u8) -> Result<(), HalError> {
        self.with(|s| {
            if let Some(e) = s.fail_detach.take() {
                return Err(e);
            }
            s.handlers.retain(|(p, _)| *p != pin);
            s.detached.push(pin);
            Ok(())
        })
    }
}

/// Event loop operation, with the observed context's registration at the time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOp {
    Register {
        id: u32,
        seen: Option<RegistrationKind>,
    },
    Unregister {
        id: u32,
        seen: Option<RegistrationKind>,
    },
}

#[derive(Default)]
struct LoopState {
    next_instance: u32,
    live: Vec<(u32, u32)>,
    ops: Vec<LoopOp>,
    posted: Vec<u32>,
    isr_posted: Vec<u32>,
    fail_register: Option<HalError>,
    fail_unregister: Option<HalError>,
    observed: Option<&'static InterruptContext<MockLoop>>,
}

/// Event loop recording registrations and posts
pub struct MockLoop {
    state: Mutex<LoopState>,
}

impl MockLoop {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LoopState::default()),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut LoopState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Record the registration of `context` with every operation
    pub fn observe(&self, context: &'static InterruptContext<MockLoop>) {
        self.with(|s| s.observed = Some(context));
    }

    fn seen(&self) -> Option<RegistrationKind> {
        // Read outside the loop lock; the context takes its own lock
        let observed = self.with(|s| s.observed);
        observed.map(|context| context.registration())
    }

    pub fn fail_next_register(&self, error: HalError) {
        self.with(|s| s.fail_register = Some(error));
    }

    pub fn fail_next_unregister(&self, error: HalError) {
        self.with(|s| s.fail_unregister = Some(error));
    }

    pub fn live_handlers(&self) -> usize {
        self.with(|s| s.live.len())
    }

    pub fn ops(&self) -> Vec<LoopOp> {
        self.with(|s| s.ops.clone())
    }

    pub fn posted(&self) -> Vec<u32> {
        self.with(|s| s.posted.clone())
    }

    pub fn isr_posted(&self) -> Vec<u32> {
        self.with(|s| s.isr_posted.clone())
    }
}

impl EventLoop for MockLoop {
    type Handler = fn(EventBase, u32);
    type Instance = u32;

    fn register(
        &self,
        _base: EventBase,
        id: u32,
        _handler: Self::Handler,
    ) -> Result<Self::Instance, HalError> {
        let seen = self.seen();
        self.with(|s| {
            s.ops.push(LoopOp::Register { id, seen });
            if let Some(e) = s.fail_register.take() {
                return Err(e);
            }
            s.next_instance += 1;
            s.live.push((s.next_instance, id));
            Ok(s.next_instance)
        })
    }

    fn unregister(
        &self,
        _base: EventBase,
        id: u32,
        instance: Self::Instance,
    ) -> Result<(), HalError> {
        let seen = self.seen();
        self.with(|s| {
            s.ops.push(LoopOp::Unregister { id, seen });
            if let Some(e) = s.fail_unregister.take() {
                return Err(e);
            }
            let before = s.live.len();
            s.live.retain(|(i, _)| *i != instance);
            if s.live.len() == before {
                return Err(HalError::NotFound);
            }
            Ok(())
        })
    }

    fn post(&self, _base: EventBase, id: u32) -> Result<(), HalError> {
        self.with(|s| s.posted.push(id));
        Ok(())
    }

    fn post_from_isr(&self, _base: EventBase, id: u32) -> Result<(), HalError> {
        self.with(|s| s.isr_posted.push(id));
        Ok(())
    }
}

/// Single I2C device with a 256-byte register file
pub struct MockBus {
    pub address: u8,
    pub registers: [u8; 256],
    /// Shape of each transaction: written bytes and read lengths
    pub transactions: Vec<Vec<BusOp>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Write(Vec<u8>),
    Read(usize),
}

impl MockBus {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            transactions: Vec::new(),
        }
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut record = Vec::new();
        let mut pointer: Option<u8> = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    record.push(BusOp::Write(bytes.to_vec()));
                    for &byte in bytes.iter() {
                        match pointer {
                            None => pointer = Some(byte),
                            Some(reg) => {
                                self.registers[reg as usize] = byte;
                                pointer = Some(reg.wrapping_add(1));
                            }
                        }
                    }
                }
                Operation::Read(buf) => {
                    record.push(BusOp::Read(buf.len()));
                    let mut reg = pointer.unwrap_or(0);
                    for byte in buf.iter_mut() {
                        *byte = self.registers[reg as usize];
                        reg = reg.wrapping_add(1);
                    }
                    pointer = Some(reg);
                }
            }
        }
        self.transactions.push(record);
        Ok(())
    }
}

/// Hands out [`MockBus`] instances
pub struct MockI2cDriver {
    pub address: u8,
    pub installed: Vec<(u8, I2cConfig)>,
    pub fail: Option<HalError>,
}

impl I2cDriver for MockI2cDriver {
    type Bus = MockBus;

    fn install(&mut self, port: u8, config: &I2cConfig) -> Result<MockBus, HalError> {
        if let Some(e) = self.fail.take() {
            return Err(e);
        }
        self.installed.push((port, *config));
        Ok(MockBus::new(self.address))
    }
}
