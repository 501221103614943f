//! Plugin context — what a plugin can reach during `initialize`.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use shipdeck_core::error::AppError;
use shipdeck_core::result::AppResult;

use crate::events::{
    DispatchReport, EventBus, EventHandler, EventPayload, FnHandler, HandlerResult,
};

/// Context passed to [`Plugin::initialize`](crate::descriptor::Plugin::initialize).
///
/// Handlers subscribed through the context are attributed to the plugin, so
/// they show up with its identifier in dispatch failures and are dropped if
/// initialization fails.
#[derive(Debug, Clone, Copy)]
pub struct PluginContext<'a> {
    /// Plugin being initialized.
    plugin_id: &'a str,
    /// Host event bus.
    bus: &'a EventBus,
    /// The plugin's package directory, when discovered on disk.
    directory: Option<&'a Path>,
    /// `[settings]` table of the plugin manifest.
    settings: &'a Map<String, Value>,
}

impl<'a> PluginContext<'a> {
    /// Creates a context.
    pub fn new(
        plugin_id: &'a str,
        bus: &'a EventBus,
        directory: Option<&'a Path>,
        settings: &'a Map<String, Value>,
    ) -> Self {
        Self {
            plugin_id,
            bus,
            directory,
            settings,
        }
    }

    /// Identifier of the plugin being initialized.
    pub fn plugin_id(&self) -> &str {
        self.plugin_id
    }

    /// The plugin's package directory.
    pub fn directory(&self) -> Option<&Path> {
        self.directory
    }

    /// Raw manifest settings.
    pub fn settings(&self) -> &Map<String, Value> {
        self.settings
    }

    /// Reads a typed manifest setting. `Ok(None)` when absent.
    pub fn setting<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        self.settings
            .get(key)
            .map(|value| {
                T::deserialize(value).map_err(|e| {
                    AppError::plugin(format!(
                        "Plugin '{}' setting '{}' is invalid: {}",
                        self.plugin_id, key, e
                    ))
                })
            })
            .transpose()
    }

    /// Subscribes a handler to an event.
    pub fn subscribe(&self, event: impl Into<String>, handler: Arc<dyn EventHandler>) {
        self.bus.subscribe_for(self.plugin_id, event, handler);
    }

    /// Subscribes a closure to an event.
    pub fn on<F>(&self, event: impl Into<String>, name: impl Into<String>, handler: F)
    where
        F: Fn(&EventPayload) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe(event, Arc::new(FnHandler::new(name, handler)));
    }

    /// Publishes an event on the host bus.
    ///
    /// Subscriptions go through [`subscribe`](Self::subscribe) or
    /// [`on`](Self::on) only; the bus itself is not exposed.
    pub fn publish(&self, event: &str, payload: &EventPayload) -> DispatchReport {
        self.bus.publish(event, payload)
    }
}
