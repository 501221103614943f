//! `shipdeck config` — print the effective configuration.

use shipdeck_core::config::AppConfig;
use shipdeck_core::error::AppError;

use super::print_json;

/// Execute the config command
pub fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.server.uses_placeholder_secret() && !config.server.debug {
        tracing::warn!("server.secret_key is the placeholder value");
    }
    print_json(&config.redacted()?)
}
