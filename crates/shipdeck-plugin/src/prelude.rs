//! Prelude for convenient imports in plugin crates.

pub use shipdeck_core::error::AppError;
pub use shipdeck_core::events::{
    DomainEvent, SHIPMENT_CREATED, SHIPMENT_UPDATED, Shipment, TRACKING_UPDATED, Tracking,
};
pub use shipdeck_core::result::AppResult;

pub use crate::context::PluginContext;
pub use crate::descriptor::{Plugin, PluginInfo};
pub use crate::events::{EventBus, EventHandler, EventPayload, FnHandler, HandlerResult};

pub use crate::plugin_info;
