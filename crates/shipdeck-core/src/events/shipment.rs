//! Shipment domain types and events.

use serde::{Deserialize, Serialize};

use super::{DomainEvent, SHIPMENT_CREATED, SHIPMENT_UPDATED};

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Contact person.
    pub person_name: Option<String>,
    /// Company name.
    pub company_name: Option<String>,
    /// First address line.
    pub address_line1: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
}

/// A shipment as seen by plugins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    /// Shipment identifier, e.g. `SHP-1`.
    pub id: String,
    /// Lifecycle status, e.g. `draft`, `purchased`, `delivered`.
    #[serde(default = "default_status")]
    pub status: String,
    /// Carrier tracking number, once purchased.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Carrier name.
    #[serde(default)]
    pub carrier_name: Option<String>,
    /// Origin address.
    #[serde(default)]
    pub shipper: Option<Address>,
    /// Destination address.
    #[serde(default)]
    pub recipient: Option<Address>,
}

impl Shipment {
    /// Creates a draft shipment with only an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: default_status(),
            ..Default::default()
        }
    }

    /// Sets the recipient.
    pub fn with_recipient(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }
}

fn default_status() -> String {
    "draft".to_string()
}

/// `shipment.created`; the payload is the shipment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentCreated(pub Shipment);

impl DomainEvent for ShipmentCreated {
    const NAME: &'static str = SHIPMENT_CREATED;
}

/// `shipment.updated`; the payload is the shipment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentUpdated(pub Shipment);

impl DomainEvent for ShipmentUpdated {
    const NAME: &'static str = SHIPMENT_UPDATED;
}
