//! GPIO interrupt dispatch
//!
//! - [`service`] - process-wide install gate for the pin interrupt service
//! - [`context`] - per-pin context handed to the vector, and the dispatcher
//! - `registration` - mutually exclusive handler/queue registration

pub mod context;
mod registration;
pub mod service;

pub use context::{InterruptContext, Registration, RegistrationKind, CONTEXT_TAG, INPUT_EVENTS};
pub(crate) use registration::{release, LoopTarget};
pub use service::IsrService;
