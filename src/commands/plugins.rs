//! `shipdeck plugins` — discover plugins and report the outcome.

use serde::Serialize;

use shipdeck_core::config::AppConfig;
use shipdeck_core::error::AppError;
use shipdeck_plugin::{LoadReport, PluginHost, PluginInfo, SkipReason};

use super::{OutputFormat, load_host, print_json};

/// A failed candidate, flattened for display.
#[derive(Debug, Serialize)]
pub struct FailureRow {
    /// Candidate name.
    pub candidate: String,
    /// Error kind.
    pub kind: &'static str,
    /// Error message.
    pub message: String,
}

/// A skipped entry, flattened for display.
#[derive(Debug, Serialize)]
pub struct SkippedRow {
    /// Entry name.
    pub candidate: String,
    /// Skip reason.
    pub reason: SkipReason,
}

/// Discovery summary.
#[derive(Debug, Serialize)]
pub struct PluginsSummary {
    /// Scanned directory.
    pub directory: String,
    /// Loaded plugins.
    pub plugins: Vec<PluginInfo>,
    /// Activation list.
    pub installed_apps: Vec<String>,
    /// Failed candidates.
    pub failures: Vec<FailureRow>,
    /// Skipped entries.
    pub skipped: Vec<SkippedRow>,
}

impl PluginsSummary {
    /// Builds the summary from a loaded host.
    pub fn new(config: &AppConfig, host: &PluginHost, report: &LoadReport) -> Self {
        Self {
            directory: config.plugins.directory.clone(),
            plugins: host.plugins(),
            installed_apps: host.installed_apps().to_vec(),
            failures: report
                .failures
                .iter()
                .map(|f| FailureRow {
                    candidate: f.candidate.clone(),
                    kind: f.kind(),
                    message: f.error.to_string(),
                })
                .collect(),
            skipped: report
                .skipped
                .iter()
                .map(|s| SkippedRow {
                    candidate: s.candidate.clone(),
                    reason: s.reason,
                })
                .collect(),
        }
    }
}

/// Execute the plugins command
pub fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let (host, report) = load_host(config)?;
    let summary = PluginsSummary::new(config, &host, &report);

    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => {
            println!("Plugin directory: {}", summary.directory);

            println!("\nLoaded plugins ({}):", summary.plugins.len());
            for info in &summary.plugins {
                println!("  {} {} ({})", info.id, info.version, info.name);
            }

            println!("\nInstalled apps:");
            for app in &summary.installed_apps {
                println!("  {}", app);
            }

            if !summary.failures.is_empty() {
                println!("\nFailed candidates:");
                for failure in &summary.failures {
                    println!("  {} [{}] {}", failure.candidate, failure.kind, failure.message);
                }
            }

            if !summary.skipped.is_empty() {
                println!("\nSkipped entries:");
                for skipped in &summary.skipped {
                    println!("  {} [{}]", skipped.candidate, skipped.reason.as_str());
                }
            }
            Ok(())
        }
    }
}
