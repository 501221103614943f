//! Convenience macros for plugin development.

/// Builds a [`PluginInfo`](crate::descriptor::PluginInfo).
///
/// # Example
/// ```rust
/// let info = shipdeck_plugin::plugin_info!(
///     id: "custom_integration",
///     name: "Custom Integration",
///     version: "1.0.0",
///     description: "A sample custom integration plugin for Karrio"
/// );
/// assert!(info.validate().is_ok());
/// ```
#[macro_export]
macro_rules! plugin_info {
    (
        id: $id:expr,
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr $(,)?
    ) => {
        $crate::descriptor::PluginInfo {
            id: $id.to_string(),
            name: $name.to_string(),
            version: $version.to_string(),
            description: $desc.to_string(),
        }
    };
    (
        id: $id:expr,
        name: $name:expr,
        version: $version:expr $(,)?
    ) => {
        $crate::plugin_info!(id: $id, name: $name, version: $version, description: "")
    };
}

/// Exports a plugin from a shared library for the `dynamic` loader.
///
/// Generates `_shipdeck_plugin_api_version` and `_shipdeck_plugin_create`.
/// Invoke at most once per library, and only in builds meant to be loaded
/// dynamically: two invocations linked into one binary collide.
///
/// # Example
/// ```rust,ignore
/// #[cfg(feature = "dynamic")]
/// shipdeck_plugin::declare_plugin!(CustomIntegration::new());
/// ```
#[macro_export]
macro_rules! declare_plugin {
    ($constructor:expr) => {
        #[doc(hidden)]
        #[unsafe(no_mangle)]
        pub fn _shipdeck_plugin_api_version() -> u32 {
            $crate::API_VERSION
        }

        #[doc(hidden)]
        #[unsafe(no_mangle)]
        pub fn _shipdeck_plugin_create() -> *mut dyn $crate::descriptor::Plugin {
            let plugin: ::std::boxed::Box<dyn $crate::descriptor::Plugin> =
                ::std::boxed::Box::new($constructor);
            ::std::boxed::Box::into_raw(plugin)
        }
    };
}
