//! Custom integration plugin for Shipdeck.
//!
//! Demonstrates extending the platform: reacts to shipment and tracking
//! events and exposes a [`CustomService`] with shipment processing and
//! validation rules.

pub mod hooks;
pub mod plugin;
pub mod services;

pub use plugin::{CustomIntegration, ENTRY, PLUGIN_ID, SUBSCRIBED_EVENTS};
pub use services::{CustomService, ProcessingResult, ValidationResult};

#[cfg(feature = "dynamic")]
shipdeck_plugin::declare_plugin!(CustomIntegration::new());
