//! Event bus — handler registration and synchronous fan-out dispatch.

pub mod bus;
pub mod handler;
pub mod payload;

pub use bus::{DispatchReport, EventBus, HandlerFailure};
pub use handler::{EventHandler, FnHandler, HandlerResult};
pub use payload::EventPayload;
