//! Custom integration plugin implementation.

use std::sync::Arc;

use tracing::{info, warn};

use shipdeck_plugin::prelude::*;

use crate::hooks::{ShipmentCreatedHook, ShipmentUpdatedHook, TrackingUpdatedHook};
use crate::services::{CustomService, DEFAULT_CUSTOM_DATA};

/// Plugin identifier.
pub const PLUGIN_ID: &str = "custom_integration";

/// Catalog entry name.
pub const ENTRY: &str = "custom_integration";

/// Events handled when the manifest does not narrow them with `events`.
pub const SUBSCRIBED_EVENTS: &[&str] = &[SHIPMENT_CREATED, SHIPMENT_UPDATED, TRACKING_UPDATED];

/// Custom integration plugin
#[derive(Debug)]
pub struct CustomIntegration {
    info: PluginInfo,
}

impl CustomIntegration {
    /// Create a new custom integration plugin
    pub fn new() -> Self {
        Self {
            info: plugin_info!(
                id: PLUGIN_ID,
                name: "Custom Integration",
                version: "1.0.0",
                description: "A sample custom integration plugin for Karrio",
            ),
        }
    }

    /// Catalog factory.
    pub fn factory() -> Arc<dyn Plugin> {
        Arc::new(Self::new())
    }
}

impl Default for CustomIntegration {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for CustomIntegration {
    fn info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn initialize(&self, ctx: &PluginContext<'_>) -> AppResult<()> {
        let custom_data = ctx
            .setting::<String>("custom_data")?
            .unwrap_or_else(|| DEFAULT_CUSTOM_DATA.to_string());
        let service = Arc::new(CustomService::new(custom_data));

        let events = ctx
            .setting::<Vec<String>>("events")?
            .unwrap_or_else(|| SUBSCRIBED_EVENTS.iter().map(|e| e.to_string()).collect());

        for event in &events {
            let handler: Arc<dyn EventHandler> = match event.as_str() {
                SHIPMENT_CREATED => Arc::new(ShipmentCreatedHook::new(Arc::clone(&service))),
                SHIPMENT_UPDATED => Arc::new(ShipmentUpdatedHook),
                TRACKING_UPDATED => Arc::new(TrackingUpdatedHook),
                other => {
                    warn!(
                        plugin_id = %self.info.id,
                        event = %other,
                        "No handler for event, ignoring"
                    );
                    continue;
                }
            };
            ctx.subscribe(event.as_str(), handler);
        }

        info!(
            plugin_id = %self.info.id,
            version = %self.info.version,
            events = ?events,
            "Custom Integration plugin initialized"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    #[test]
    fn test_descriptor() {
        let info = CustomIntegration::new().info();
        assert_eq!(info.id, "custom_integration");
        assert_eq!(info.name, "Custom Integration");
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.description, "A sample custom integration plugin for Karrio");
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_initialize_subscribes_host_events() {
        let bus = EventBus::new();
        let settings = Map::new();
        let ctx = PluginContext::new(PLUGIN_ID, &bus, None, &settings);

        CustomIntegration::new().initialize(&ctx).unwrap();

        for event in [SHIPMENT_CREATED, SHIPMENT_UPDATED, TRACKING_UPDATED] {
            assert_eq!(bus.handler_count(event), 1, "{event}");
        }
    }

    #[test]
    fn test_events_setting_narrows_subscriptions() {
        let bus = EventBus::new();
        let settings = json!({"events": ["shipment.created", "order.cancelled"]})
            .as_object()
            .cloned()
            .unwrap();
        let ctx = PluginContext::new(PLUGIN_ID, &bus, None, &settings);

        CustomIntegration::new().initialize(&ctx).unwrap();

        assert_eq!(bus.event_names(), vec!["shipment.created"]);
    }

    #[test]
    fn test_invalid_setting_fails_initialize() {
        let bus = EventBus::new();
        let settings = json!({"custom_data": 42}).as_object().cloned().unwrap();
        let ctx = PluginContext::new(PLUGIN_ID, &bus, None, &settings);

        assert!(CustomIntegration::new().initialize(&ctx).is_err());
        assert!(!bus.has_handlers(SHIPMENT_CREATED));
    }
}
