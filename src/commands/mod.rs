//! CLI command definitions and dispatch.

pub mod config;
pub mod plugins;
pub mod publish;

use clap::{Parser, Subcommand};
use serde::Serialize;

use plugin_custom_integration::CustomIntegration;
use shipdeck_core::config::AppConfig;
use shipdeck_core::error::AppError;
use shipdeck_plugin::{LoadReport, PluginCatalog, PluginHost};

/// Shipdeck — plugin host for the shipping platform
#[derive(Debug, Parser)]
#[command(name = "shipdeck", version, about, long_about = None)]
pub struct Cli {
    /// Override `plugins.directory`
    #[arg(long, global = true)]
    pub plugins_dir: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover plugins and show what was activated
    Plugins,
    /// Publish an event to loaded plugins
    Publish(publish::PublishArgs),
    /// Show the effective configuration with secrets masked
    Config,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, mut config: AppConfig) -> Result<(), AppError> {
        if let Some(dir) = &self.plugins_dir {
            config.plugins.directory = dir.clone();
        }

        match &self.command {
            Commands::Plugins => plugins::execute(&config, self.format),
            Commands::Publish(args) => publish::execute(args, &config, self.format),
            Commands::Config => config::execute(&config),
        }
    }
}

/// Compiled-in plugins available to discovered packages.
pub fn catalog() -> PluginCatalog {
    PluginCatalog::new().with(plugin_custom_integration::ENTRY, CustomIntegration::factory)
}

/// Builds the host and runs discovery.
pub fn load_host(config: &AppConfig) -> Result<(PluginHost, LoadReport), AppError> {
    let mut host = PluginHost::from_config(config, catalog());
    let report = host.load_plugins()?;
    Ok((host, report))
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
