//! Event handler trait and closure adapter.

use std::fmt;

use super::payload::EventPayload;

/// Result of a single handler invocation.
///
/// An `Err` is recorded by the bus and never stops the dispatch.
pub type HandlerResult = anyhow::Result<()>;

/// A unit of code invoked with the payload of every matching event.
pub trait EventHandler: Send + Sync {
    /// Handler name used in diagnostics.
    fn name(&self) -> &str;

    /// Handles one event.
    fn handle(&self, payload: &EventPayload) -> HandlerResult;
}

type HandlerFn = dyn Fn(&EventPayload) -> HandlerResult + Send + Sync;

/// A closure-based handler for quick handler creation.
pub struct FnHandler {
    /// Handler name.
    name: String,
    /// Handler function.
    handler: Box<HandlerFn>,
}

impl FnHandler {
    /// Creates a new closure-based handler.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&EventPayload) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(handler),
        }
    }
}

impl fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl EventHandler for FnHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, payload: &EventPayload) -> HandlerResult {
        (self.handler)(payload)
    }
}
