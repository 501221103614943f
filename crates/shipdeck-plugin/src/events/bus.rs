//! Event bus — handlers registered by event name, dispatched in
//! registration order.
//!
//! Dispatch is a best-effort broadcast:
//! - Every handler for the event runs, synchronously, on the caller's thread.
//! - A handler returning `Err` or panicking is recorded and skipped past.
//! - Failures are reported to the caller in a [`DispatchReport`], never
//!   raised unless the caller asks for it with [`DispatchReport::into_result`].
//!
//! Each event's handler list is a copy-on-write snapshot. Publishers clone
//! the snapshot and release the lock before running handlers, so late
//! subscriptions never race a dispatch and handlers may themselves
//! subscribe or publish.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use shipdeck_core::error::AppError;
use shipdeck_core::events::DomainEvent;
use shipdeck_core::result::AppResult;

use super::handler::{EventHandler, FnHandler, HandlerResult};
use super::payload::EventPayload;

/// Number of handler failures kept for operator inspection.
const FAILURE_JOURNAL_CAPACITY: usize = 128;

/// Entry in an event's handler list.
#[derive(Clone)]
struct HandlerEntry {
    /// The handler.
    handler: Arc<dyn EventHandler>,
    /// Plugin that registered this handler, if any.
    plugin_id: Option<Arc<str>>,
}

/// A handler that failed during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerFailure {
    /// Event being dispatched.
    pub event: String,
    /// Name of the failing handler.
    pub handler: String,
    /// Plugin owning the handler.
    pub plugin_id: Option<String>,
    /// Error or panic message.
    pub message: String,
    /// Whether the handler panicked rather than returning an error.
    pub panicked: bool,
}

/// Outcome of publishing one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Event name.
    pub event: String,
    /// Number of handlers invoked.
    pub invoked: usize,
    /// Handlers that failed, in dispatch order.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    fn empty(event: &str) -> Self {
        Self {
            event: event.to_string(),
            ..Default::default()
        }
    }

    /// Whether every invoked handler succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of handlers that completed without error.
    pub fn succeeded(&self) -> usize {
        self.invoked - self.failures.len()
    }

    /// Converts recorded failures into an error, for callers that want
    /// handler failures to propagate.
    pub fn into_result(self) -> AppResult<Self> {
        let Some(first) = self.failures.first() else {
            return Ok(self);
        };

        Err(AppError::handler(format!(
            "{} of {} handler(s) failed for '{}'; first: '{}': {}",
            self.failures.len(),
            self.invoked,
            self.event,
            first.handler,
            first.message
        )))
    }
}

/// Process-wide publish/subscribe registry, owned by the host.
pub struct EventBus {
    /// Event name → handlers in registration order.
    handlers: RwLock<HashMap<String, Arc<[HandlerEntry]>>>,
    /// Most recent handler failures, oldest first.
    journal: Mutex<VecDeque<HandlerFailure>>,
}

impl EventBus {
    /// Creates an empty event bus.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            journal: Mutex::new(VecDeque::with_capacity(FAILURE_JOURNAL_CAPACITY)),
        }
    }

    /// Appends a handler to the event's handler list.
    pub fn subscribe(&self, event: impl Into<String>, handler: Arc<dyn EventHandler>) {
        self.insert(event.into(), handler, None);
    }

    /// Subscribes a closure.
    pub fn subscribe_fn<F>(&self, event: impl Into<String>, name: impl Into<String>, handler: F)
    where
        F: Fn(&EventPayload) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe(event, Arc::new(FnHandler::new(name, handler)));
    }

    /// Appends a handler owned by a plugin.
    pub(crate) fn subscribe_for(
        &self,
        plugin_id: &str,
        event: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) {
        self.insert(event.into(), handler, Some(Arc::from(plugin_id)));
    }

    fn insert(&self, event: String, handler: Arc<dyn EventHandler>, plugin_id: Option<Arc<str>>) {
        let name = handler.name().to_string();

        let mut handlers = self.handlers.write();
        let mut entries: Vec<HandlerEntry> = handlers
            .get(&event)
            .map(|existing| existing.to_vec())
            .unwrap_or_default();
        entries.push(HandlerEntry {
            handler,
            plugin_id: plugin_id.clone(),
        });
        let position = entries.len();
        handlers.insert(event.clone(), entries.into());
        drop(handlers);

        info!(
            event = %event,
            handler = %name,
            plugin_id = plugin_id.as_deref().unwrap_or("-"),
            position = position,
            "Event handler registered"
        );
    }

    /// Removes every handler registered by a plugin. Returns how many were
    /// removed.
    pub(crate) fn unsubscribe_plugin(&self, plugin_id: &str) -> usize {
        let mut handlers = self.handlers.write();
        let mut removed = 0;

        for entries in handlers.values_mut() {
            let kept: Vec<HandlerEntry> = entries
                .iter()
                .filter(|e| e.plugin_id.as_deref() != Some(plugin_id))
                .cloned()
                .collect();
            if kept.len() != entries.len() {
                removed += entries.len() - kept.len();
                *entries = kept.into();
            }
        }

        handlers.retain(|_, entries| !entries.is_empty());

        if removed > 0 {
            info!(
                plugin_id = %plugin_id,
                removed = removed,
                "Event handlers unregistered for plugin"
            );
        }
        removed
    }

    /// Publishes an event to all its handlers, in registration order.
    ///
    /// Publishing an event nobody subscribed to is a no-op.
    pub fn publish(&self, event: &str, payload: &EventPayload) -> DispatchReport {
        let Some(entries) = self.snapshot(event) else {
            debug!(event = %event, "No handlers registered, skipping dispatch");
            return DispatchReport::empty(event);
        };

        debug!(
            event = %event,
            handler_count = entries.len(),
            payload_id = %payload.id,
            "Dispatching event"
        );

        let mut report = DispatchReport::empty(event);

        for entry in entries.iter() {
            report.invoked += 1;

            let outcome = catch_unwind(AssertUnwindSafe(|| entry.handler.handle(payload)));
            let (message, panicked) = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => (format!("{e:#}"), false),
                Err(panic) => (panic_message(panic.as_ref()), true),
            };

            let failure = HandlerFailure {
                event: event.to_string(),
                handler: entry.handler.name().to_string(),
                plugin_id: entry.plugin_id.as_deref().map(str::to_string),
                message,
                panicked,
            };

            error!(
                event = %failure.event,
                handler = %failure.handler,
                plugin_id = failure.plugin_id.as_deref().unwrap_or("-"),
                panicked = failure.panicked,
                error = %failure.message,
                "Event handler failed, continuing dispatch"
            );

            self.record(failure.clone());
            report.failures.push(failure);
        }

        report
    }

    /// Publishes raw JSON data.
    pub fn publish_value(&self, event: &str, data: Value) -> DispatchReport {
        self.publish(event, &EventPayload::new(data))
    }

    /// Publishes a typed domain event under its own name.
    pub fn emit<E: DomainEvent>(&self, event: &E) -> AppResult<DispatchReport> {
        let payload = EventPayload::from_event(event)?;
        Ok(self.publish(E::NAME, &payload))
    }

    fn snapshot(&self, event: &str) -> Option<Arc<[HandlerEntry]>> {
        self.handlers.read().get(event).cloned()
    }

    fn record(&self, failure: HandlerFailure) {
        let mut journal = self.journal.lock();
        if journal.len() == FAILURE_JOURNAL_CAPACITY {
            journal.pop_front();
        }
        journal.push_back(failure);
    }

    /// Most recent handler failures across all dispatches, oldest first.
    pub fn recent_failures(&self) -> Vec<HandlerFailure> {
        self.journal.lock().iter().cloned().collect()
    }

    /// Returns whether any handlers are registered for an event.
    pub fn has_handlers(&self, event: &str) -> bool {
        self.handlers.read().contains_key(event)
    }

    /// Returns the number of handlers registered for an event.
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.read().get(event).map_or(0, |entries| entries.len())
    }

    /// Returns all event names with at least one handler, sorted.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.event_names())
            .finish()
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
