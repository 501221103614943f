//! Server, security, and host application configuration.

use serde::{Deserialize, Serialize};

/// Web server settings inherited by the hosted platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Debug mode. Production deployments keep this off.
    #[serde(default)]
    pub debug: bool,
    /// Secret key used by the platform for signing.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// Host names the platform answers for.
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
    /// Origins allowed to make cross-origin requests.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    /// Directory static assets are collected into.
    #[serde(default = "default_static_root")]
    pub static_root: String,
    /// URL prefix for static assets.
    #[serde(default = "default_static_url")]
    pub static_url: String,
    /// Directory user uploads are written to.
    #[serde(default = "default_media_root")]
    pub media_root: String,
    /// URL prefix for uploaded media.
    #[serde(default = "default_media_url")]
    pub media_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            secret_key: default_secret_key(),
            allowed_hosts: default_allowed_hosts(),
            cors_allowed_origins: Vec::new(),
            static_root: default_static_root(),
            static_url: default_static_url(),
            media_root: default_media_root(),
            media_url: default_media_url(),
        }
    }
}

impl ServerConfig {
    /// Returns whether the secret key is still the placeholder value.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret_key == default_secret_key()
    }
}

/// HTTPS and cookie hardening toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Whether the deployment is served over HTTPS.
    #[serde(default)]
    pub use_https: bool,
}

impl SecurityConfig {
    /// Whether plain HTTP requests are redirected to HTTPS.
    pub fn ssl_redirect(&self) -> bool {
        self.use_https
    }

    /// Whether session and CSRF cookies carry the `Secure` flag.
    pub fn secure_cookies(&self) -> bool {
        self.use_https
    }

    /// Header set by the TLS-terminating proxy, when HTTPS is on.
    pub fn proxy_ssl_header(&self) -> Option<(&'static str, &'static str)> {
        self.use_https.then_some(("HTTP_X_FORWARDED_PROTO", "https"))
    }
}

/// Host platform application and middleware lists.
///
/// Loaded plugins are appended to `installed_apps` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Applications the platform activates before any plugin.
    #[serde(default = "default_installed_apps")]
    pub installed_apps: Vec<String>,
    /// Middleware chain of the platform.
    #[serde(default = "default_middleware")]
    pub middleware: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            installed_apps: default_installed_apps(),
            middleware: default_middleware(),
        }
    }
}

/// Middleware that enforces the security toggles.
pub const SECURITY_MIDDLEWARE: &str = "django.middleware.security.SecurityMiddleware";

impl HostConfig {
    /// Returns the middleware chain, with the security middleware leading it
    /// outside of debug mode.
    pub fn effective_middleware(&self, debug: bool) -> Vec<String> {
        if debug || self.middleware.first().is_some_and(|m| m == SECURITY_MIDDLEWARE) {
            return self.middleware.clone();
        }

        let mut chain = Vec::with_capacity(self.middleware.len() + 1);
        chain.push(SECURITY_MIDDLEWARE.to_string());
        chain.extend(
            self.middleware
                .iter()
                .filter(|m| m.as_str() != SECURITY_MIDDLEWARE)
                .cloned(),
        );
        chain
    }
}

fn default_secret_key() -> String {
    "your-secret-key-here".to_string()
}

fn default_allowed_hosts() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_static_root() -> String {
    "/karrio/static".to_string()
}

fn default_static_url() -> String {
    "/static/".to_string()
}

fn default_media_root() -> String {
    "/karrio/media".to_string()
}

fn default_media_url() -> String {
    "/media/".to_string()
}

fn default_installed_apps() -> Vec<String> {
    vec![
        "karrio.server.core".to_string(),
        "karrio.server.providers".to_string(),
        "karrio.server.manager".to_string(),
        "karrio.server.events".to_string(),
    ]
}

fn default_middleware() -> Vec<String> {
    vec![
        "django.contrib.sessions.middleware.SessionMiddleware".to_string(),
        "django.middleware.common.CommonMiddleware".to_string(),
        "django.middleware.csrf.CsrfViewMiddleware".to_string(),
    ]
}
