//! Event payloads passed to handlers.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shipdeck_core::events::DomainEvent;
use shipdeck_core::result::AppResult;

/// Payload handed to every handler of one dispatch.
///
/// The bus never inspects `data`; handlers decide how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Unique payload ID, shared by all handlers of one dispatch.
    pub id: Uuid,
    /// When the payload was created.
    pub occurred_at: DateTime<Utc>,
    /// The domain data.
    pub data: Value,
}

impl EventPayload {
    /// Wraps arbitrary JSON data.
    pub fn new(data: Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            data,
        }
    }

    /// Serializes a typed domain event.
    pub fn from_event<E: DomainEvent>(event: &E) -> AppResult<Self> {
        Ok(Self::new(serde_json::to_value(event)?))
    }

    /// Decodes the data into a typed value.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    /// Gets a top-level data value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Gets a top-level string value by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for EventPayload {
    fn from(data: Value) -> Self {
        Self::new(data)
    }
}
