//! # Console configuration: `admin-console.toml`
//!
//! Where the console finds the labeling backend and how it pages through it.
//! Desktop reads the file from the platform config directory
//! (filename: [`ConsoleConfig::filename`]); web builds use the defaults, which
//! point at the same origin that served the app.
//!
//! ## Structure
//!
//! ```toml
//! [server]
//! base_url = "https://labels.example.com"   # empty = same origin
//! roles_base_url = "http://localhost:8010"  # host of the roles endpoints
//! token = "..."                             # optional API token
//!
//! [directory]
//! page_size = 10
//!
//! [projects]
//! page_size = 1000
//!
//! [overlay]
//! namespace = ""                            # empty = unscoped keys
//! ```
//!
//! All structs derive `Default` (with sensible production defaults) so that a
//! missing or empty config file is equivalent to the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `admin-console.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

/// Backend location and credentials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the labeling backend. Empty means same origin.
    #[serde(default)]
    pub base_url: String,
    /// Base URL serving the per-user roles and role grant endpoints.
    #[serde(default = "default_roles_base_url")]
    pub roles_base_url: String,
    /// API token sent as `Authorization: Token <token>`.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_roles_base_url() -> String {
    "http://localhost:8010".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            roles_base_url: default_roles_base_url(),
            token: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Users per directory page.
    #[serde(default = "default_directory_page_size")]
    pub page_size: u32,
}

fn default_directory_page_size() -> u32 {
    10
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            page_size: default_directory_page_size(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Page size used when fetching the assignable project list.
    #[serde(default = "default_projects_page_size")]
    pub page_size: u32,
}

fn default_projects_page_size() -> u32 {
    1000
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            page_size: default_projects_page_size(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Prefix isolating this console's overlay keys. Empty = unscoped.
    #[serde(default)]
    pub namespace: String,
}

impl ConsoleConfig {
    /// Create a config pointing at the given backend.
    pub fn new(base_url: String) -> Self {
        Self {
            server: ServerConfig {
                base_url,
                ..ServerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Builder method to set the API token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.server.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Builder method to set the directory page size (at least 1).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.directory.page_size = page_size.max(1);
        self
    }

    /// Overlay namespace, `None` when unscoped.
    pub fn overlay_namespace(&self) -> Option<&str> {
        let ns = self.overlay.namespace.trim();
        (!ns.is_empty()).then_some(ns)
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "admin-console.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ConsoleConfig::from_toml("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.directory.page_size, 10);
        assert_eq!(config.projects.page_size, 1000);
        assert_eq!(config.server.roles_base_url, "http://localhost:8010");
        assert!(config.overlay_namespace().is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = ConsoleConfig::from_toml(
            r#"
            [server]
            base_url = "https://labels.example.com"
            token = "abc"

            [overlay]
            namespace = "prod"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "https://labels.example.com");
        assert_eq!(config.server.token.as_deref(), Some("abc"));
        assert_eq!(config.server.roles_base_url, "http://localhost:8010");
        assert_eq!(config.directory.page_size, 10);
        assert_eq!(config.overlay_namespace(), Some("prod"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ConsoleConfig::new("https://labels.example.com".to_string())
            .with_token(Some("t0k3n".to_string()))
            .with_page_size(0);
        assert_eq!(config.directory.page_size, 1);

        let text = config.to_toml().unwrap();
        assert_eq!(ConsoleConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let config = ConsoleConfig::default().with_token(Some("  ".to_string()));
        assert!(config.server.token.is_none());
    }
}
