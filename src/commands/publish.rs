//! `shipdeck publish` — publish an event to loaded plugins.

use clap::Args;
use serde_json::Value;

use shipdeck_core::config::AppConfig;
use shipdeck_core::error::AppError;
use shipdeck_plugin::EventPayload;

use super::{OutputFormat, load_host, print_json};

/// Arguments for the publish command
#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Event name, e.g. `shipment.created`
    pub event: String,

    /// Event data as a JSON document
    #[arg(short, long, default_value = "{}")]
    pub payload: String,
}

/// Execute the publish command
pub fn execute(
    args: &PublishArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let data: Value = serde_json::from_str(&args.payload)
        .map_err(|e| AppError::validation(format!("Invalid --payload JSON: {}", e)))?;

    let (host, _) = load_host(config)?;
    let report = host.publish(&args.event, &EventPayload::new(data))?;

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!(
                "{}: {} handler(s) invoked, {} failed",
                report.event,
                report.invoked,
                report.failures.len()
            );
            for failure in &report.failures {
                println!(
                    "  {} ({}): {}",
                    failure.handler,
                    failure.plugin_id.as_deref().unwrap_or("-"),
                    failure.message
                );
            }
            Ok(())
        }
    }
}
