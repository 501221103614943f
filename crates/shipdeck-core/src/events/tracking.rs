//! Tracking domain types and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DomainEvent, TRACKING_UPDATED};

/// A single carrier checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// When the checkpoint was recorded.
    pub date: DateTime<Utc>,
    /// Carrier description of the checkpoint.
    pub description: String,
    /// Where it happened.
    #[serde(default)]
    pub location: Option<String>,
}

/// Tracking state of a parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    /// Carrier tracking number.
    pub tracking_number: String,
    /// Carrier name.
    #[serde(default)]
    pub carrier_name: Option<String>,
    /// Current status, e.g. `in_transit`.
    #[serde(default)]
    pub status: Option<String>,
    /// Shipment the tracker belongs to.
    #[serde(default)]
    pub shipment_id: Option<String>,
    /// Checkpoints, newest first.
    #[serde(default)]
    pub events: Vec<TrackingEvent>,
}

/// `tracking.updated`; the payload is the tracker itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingUpdated(pub Tracking);

impl DomainEvent for TrackingUpdated {
    const NAME: &'static str = TRACKING_UPDATED;
}
