//! Event handlers registered by the custom integration plugin.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{info, warn};

use shipdeck_core::events::{Shipment, Tracking};
use shipdeck_plugin::events::{EventHandler, EventPayload, HandlerResult};

use crate::services::CustomService;

/// Handler for `shipment.created`: validates, then processes the shipment.
///
/// Processing runs on the ambient tokio runtime's blocking pool when there is
/// one so the publisher is not held up; without a runtime it runs inline.
#[derive(Debug)]
pub struct ShipmentCreatedHook {
    service: Arc<CustomService>,
}

impl ShipmentCreatedHook {
    /// Create a new shipment.created handler
    pub fn new(service: Arc<CustomService>) -> Self {
        Self { service }
    }
}

impl EventHandler for ShipmentCreatedHook {
    fn name(&self) -> &str {
        "custom_integration_shipment_created"
    }

    fn handle(&self, payload: &EventPayload) -> HandlerResult {
        let shipment: Shipment = payload.parse()?;
        info!(shipment_id = %shipment.id, "Custom plugin: shipment created");

        let validation = self.service.validate_shipment(&shipment);
        if !validation.is_valid {
            warn!(
                shipment_id = %shipment.id,
                errors = ?validation.errors,
                "Custom plugin: shipment failed validation"
            );
        }

        let service = Arc::clone(&self.service);
        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn_blocking(move || process(&service, &shipment));
            }
            Err(_) => process(&service, &shipment),
        }

        Ok(())
    }
}

fn process(service: &CustomService, shipment: &Shipment) {
    let result = service.process_shipment(shipment);
    info!(
        shipment_id = %result.shipment_id,
        status = %result.status,
        "Custom plugin: shipment processed"
    );
}

/// Handler for `shipment.updated`.
#[derive(Debug, Default)]
pub struct ShipmentUpdatedHook;

impl EventHandler for ShipmentUpdatedHook {
    fn name(&self) -> &str {
        "custom_integration_shipment_updated"
    }

    fn handle(&self, payload: &EventPayload) -> HandlerResult {
        let shipment: Shipment = payload.parse()?;
        info!(
            shipment_id = %shipment.id,
            status = %shipment.status,
            "Custom plugin: shipment updated"
        );
        Ok(())
    }
}

/// Handler for `tracking.updated`.
#[derive(Debug, Default)]
pub struct TrackingUpdatedHook;

impl EventHandler for TrackingUpdatedHook {
    fn name(&self) -> &str {
        "custom_integration_tracking_updated"
    }

    fn handle(&self, payload: &EventPayload) -> HandlerResult {
        let tracking: Tracking = payload.parse()?;
        info!(
            tracking_number = %tracking.tracking_number,
            status = tracking.status.as_deref().unwrap_or("unknown"),
            "Custom plugin: tracking updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shipment_created_inline() {
        let hook = ShipmentCreatedHook::new(Arc::new(CustomService::default()));
        assert!(hook.handle(&EventPayload::new(json!({"id": "SHP-1"}))).is_ok());
    }

    #[tokio::test]
    async fn test_shipment_created_on_runtime() {
        let hook = ShipmentCreatedHook::new(Arc::new(CustomService::default()));
        assert!(hook.handle(&EventPayload::new(json!({"id": "SHP-1"}))).is_ok());
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let hook = ShipmentCreatedHook::new(Arc::new(CustomService::default()));
        assert!(hook.handle(&EventPayload::new(json!({"status": "draft"}))).is_err());
        assert!(TrackingUpdatedHook.handle(&EventPayload::new(json!({}))).is_err());
    }

    #[test]
    fn test_tracking_updated() {
        let payload = EventPayload::new(json!({
            "tracking_number": "1Z999",
            "status": "in_transit",
            "events": [{"date": "2026-10-16T08:00:00Z", "description": "Departed facility"}]
        }));
        assert!(TrackingUpdatedHook.handle(&payload).is_ok());
    }
}
