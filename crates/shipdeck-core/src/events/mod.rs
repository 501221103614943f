//! Domain events fired by the host platform.
//!
//! The host publishes these at shipping milestones; plugins subscribe to
//! them by name. The names form the host's event vocabulary, but the bus
//! accepts any dot-namespaced name.

pub mod shipment;
pub mod tracking;

use serde::Serialize;

pub use shipment::{Address, Shipment, ShipmentCreated, ShipmentUpdated};
pub use tracking::{Tracking, TrackingEvent, TrackingUpdated};

/// Fired after a shipment is created.
pub const SHIPMENT_CREATED: &str = "shipment.created";
/// Fired after a shipment changes.
pub const SHIPMENT_UPDATED: &str = "shipment.updated";
/// Fired when new tracking information arrives.
pub const TRACKING_UPDATED: &str = "tracking.updated";

/// A typed domain event with a fixed event name.
///
/// The serialized form is what handlers receive as the payload.
pub trait DomainEvent: Serialize {
    /// Dot-namespaced event name.
    const NAME: &'static str;
}
