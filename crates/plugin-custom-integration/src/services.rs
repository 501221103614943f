//! Custom shipment services exposed by the plugin.

use serde::{Deserialize, Serialize};
use tracing::info;

use shipdeck_core::events::Shipment;

/// Default value attached to processed shipments.
pub const DEFAULT_CUSTOM_DATA: &str = "Your custom data here";

/// Outcome of [`CustomService::process_shipment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Always `processed`.
    pub status: String,
    /// Processed shipment.
    pub shipment_id: String,
    /// Integration-specific data.
    pub custom_data: String,
}

/// Outcome of [`CustomService::validate_shipment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` when `errors` is empty.
    pub is_valid: bool,
    /// Human-readable validation errors.
    pub errors: Vec<String>,
}

/// Shipment processing and validation rules of the integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomService {
    custom_data: String,
}

impl Default for CustomService {
    fn default() -> Self {
        Self::new(DEFAULT_CUSTOM_DATA)
    }
}

impl CustomService {
    /// Creates a service attaching `custom_data` to processed shipments.
    pub fn new(custom_data: impl Into<String>) -> Self {
        Self {
            custom_data: custom_data.into(),
        }
    }

    /// Runs the integration's processing on a shipment.
    pub fn process_shipment(&self, shipment: &Shipment) -> ProcessingResult {
        info!(shipment_id = %shipment.id, "Custom service processing shipment");

        ProcessingResult {
            status: "processed".to_string(),
            shipment_id: shipment.id.clone(),
            custom_data: self.custom_data.clone(),
        }
    }

    /// Checks a shipment against the integration's rules.
    pub fn validate_shipment(&self, shipment: &Shipment) -> ValidationResult {
        info!(shipment_id = %shipment.id, "Custom service validating shipment");

        let mut errors = Vec::new();
        if shipment.recipient.is_none() {
            errors.push("Recipient information is required".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
