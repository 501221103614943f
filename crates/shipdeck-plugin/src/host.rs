//! Plugin host — wires discovery, the registry and the event bus into the
//! platform's activation list.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use shipdeck_core::config::{AppConfig, PluginConfig};
use shipdeck_core::events::DomainEvent;
use shipdeck_core::result::AppResult;

use crate::descriptor::{Plugin, PluginInfo};
use crate::events::{DispatchReport, EventBus, EventPayload};
use crate::loader::{LoadOptions, LoadReport, PluginCatalog, PluginLoader};
use crate::registry::PluginRegistry;

/// Owns the plugin runtime for one host process.
#[derive(Debug)]
pub struct PluginHost {
    /// Event bus shared with plugins.
    bus: Arc<EventBus>,
    /// Loaded plugins.
    registry: Arc<PluginRegistry>,
    /// Platform apps followed by `<app_prefix>.<id>` for each loaded plugin.
    installed_apps: Vec<String>,
    /// Scanned plugin directory.
    directory: PathBuf,
    /// Prefix for activation list entries.
    app_prefix: String,
    /// Raise on handler failures instead of only reporting them.
    strict_dispatch: bool,
    /// Loader options.
    options: LoadOptions,
    /// Declared last: backing libraries must outlive plugins and handlers.
    catalog: PluginCatalog,
}

impl PluginHost {
    /// Creates a host from the `[plugins]` section and the base app list.
    pub fn new(config: &PluginConfig, installed_apps: Vec<String>, catalog: PluginCatalog) -> Self {
        Self {
            bus: Arc::new(EventBus::new()),
            registry: Arc::new(PluginRegistry::new()),
            installed_apps,
            directory: PathBuf::from(&config.directory),
            app_prefix: config.app_prefix.clone(),
            strict_dispatch: config.strict_dispatch,
            options: LoadOptions::from(config),
            catalog,
        }
    }

    /// Creates a host from the full application configuration.
    pub fn from_config(config: &AppConfig, catalog: PluginCatalog) -> Self {
        Self::new(&config.plugins, config.host.installed_apps.clone(), catalog)
    }

    /// Discovers plugins in the configured directory and activates them.
    pub fn load_plugins(&mut self) -> AppResult<LoadReport> {
        let report = self.loader().load_directory(&self.directory)?;
        self.activate(&report.loaded);
        Ok(report)
    }

    /// Activates compiled-in plugins without a directory scan.
    pub fn load_static(&mut self, plugins: Vec<Arc<dyn Plugin>>) -> AppResult<LoadReport> {
        let report = self.loader().load_static(plugins)?;
        self.activate(&report.loaded);
        Ok(report)
    }

    fn loader(&self) -> PluginLoader<'_> {
        PluginLoader::new(&self.catalog, &self.registry, &self.bus, self.options.clone())
    }

    fn activate(&mut self, loaded: &[String]) {
        for id in loaded {
            let app = format!("{}.{}", self.app_prefix, id);
            if !self.installed_apps.contains(&app) {
                info!(app = %app, "Plugin app activated");
                self.installed_apps.push(app);
            }
        }
    }

    /// Publishes an event. In strict mode handler failures become an error.
    pub fn publish(&self, event: &str, payload: &EventPayload) -> AppResult<DispatchReport> {
        self.finish(self.bus.publish(event, payload))
    }

    /// Publishes a typed host event.
    pub fn emit<E: DomainEvent>(&self, event: &E) -> AppResult<DispatchReport> {
        let report = self.bus.emit(event)?;
        self.finish(report)
    }

    fn finish(&self, report: DispatchReport) -> AppResult<DispatchReport> {
        if self.strict_dispatch {
            report.into_result()
        } else {
            Ok(report)
        }
    }

    /// The activation list.
    pub fn installed_apps(&self) -> &[String] {
        &self.installed_apps
    }

    /// Metadata of loaded plugins, sorted by identifier.
    pub fn plugins(&self) -> Vec<PluginInfo> {
        self.registry.list_all()
    }

    /// Returns the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Returns the event bus.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &PluginCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PluginContext;
    use serde_json::json;
    use shipdeck_core::error::ErrorKind;

    #[derive(Debug)]
    struct Failing;

    impl Plugin for Failing {
        fn info(&self) -> PluginInfo {
            PluginInfo::new("failing", "Failing", "1.0.0", "")
        }

        fn initialize(&self, ctx: &PluginContext<'_>) -> AppResult<()> {
            ctx.on("shipment.created", "always_fails", |_| anyhow::bail!("carrier offline"));
            Ok(())
        }
    }

    fn config(strict: bool) -> PluginConfig {
        PluginConfig {
            strict_dispatch: strict,
            ..Default::default()
        }
    }

    #[test]
    fn test_activation_list_extended() {
        let mut host = PluginHost::new(
            &config(false),
            vec!["karrio.server.core".to_string()],
            PluginCatalog::new(),
        );
        host.load_static(vec![Arc::new(Failing)]).unwrap();
        host.load_static(Vec::new()).unwrap();

        assert_eq!(
            host.installed_apps(),
            &["karrio.server.core".to_string(), "plugins.failing".to_string()]
        );
        assert_eq!(host.plugins()[0].id, "failing");
    }

    #[test]
    fn test_lenient_dispatch_reports() {
        let mut host = PluginHost::new(&config(false), Vec::new(), PluginCatalog::new());
        host.load_static(vec![Arc::new(Failing)]).unwrap();

        let report = host
            .publish("shipment.created", &EventPayload::new(json!({"id": "SHP-1"})))
            .unwrap();
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_strict_dispatch_errors() {
        let mut host = PluginHost::new(&config(true), Vec::new(), PluginCatalog::new());
        host.load_static(vec![Arc::new(Failing)]).unwrap();

        let err = host
            .publish("shipment.created", &EventPayload::new(json!({})))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Handler);

        assert!(host.publish("tracking.updated", &EventPayload::new(json!({}))).is_ok());
    }

    #[test]
    fn test_aborted_load_leaves_consistent_state() {
        let mut host = PluginHost::new(
            &config(false),
            vec!["karrio.server.core".to_string()],
            PluginCatalog::new(),
        );

        let err = host
            .load_static(vec![Arc::new(Failing), Arc::new(Failing)])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(host.plugins().is_empty());
        assert!(!host.bus().has_handlers("shipment.created"));
        assert_eq!(host.installed_apps(), &["karrio.server.core".to_string()]);
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let config = PluginConfig {
            directory: "/nonexistent/shipdeck/plugins".to_string(),
            ..Default::default()
        };
        let mut host = PluginHost::new(
            &config,
            vec!["karrio.server.core".to_string()],
            PluginCatalog::new(),
        );

        let report = host.load_plugins().unwrap();
        assert!(report.loaded.is_empty());
        assert_eq!(host.installed_apps().len(), 1);
    }
}
