// File: src/config.rs
// Purpose: Server configuration parsing from traverse.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use traverse_router::RoutingConfig;

/// Routes used when the config file declares no resources
pub const DEFAULT_ROUTES: &str = r#"
root = "root"

[resources.root]
children = { users = "users" }

[resources.users]
child = "user"

[resources.user]
pattern = "^[0-9]+$"
children = { tasks = "tasks" }

[resources.tasks]
child = "task"

[resources.task]
pattern = "^[0-9]+$"

[[paths]]
resource = "root"
handlers = ["log", "describe"]

[[paths]]
resource = "users"
method = "get"
handlers = ["log", "describe"]

[[paths]]
resource = "user"
method = "get"
handlers = ["log", "describe"]

[[paths]]
resource = "user"
name = "edit"
method = "post"
parent = "users"
handlers = ["log", "require_json", "accepted"]

[[paths]]
resource = "tasks"
handlers = ["log", "describe"]

[[paths]]
resource = "task"
handlers = ["log", "describe"]
"#;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// `None` when the file has no `[routing]` section; the demo routes apply
    #[serde(default)]
    pub routing: Option<RoutingConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Config {
    /// Load configuration from traverse.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Default server settings with the demo route tree
    #[cfg(test)]
    pub fn with_default_routes() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::default(),
            routing: Some(RoutingConfig::from_toml(DEFAULT_ROUTES)?),
        })
    }

    /// Declared routing, or the demo routes when the file has no `[routing]` section
    pub fn routing(&self) -> Result<RoutingConfig> {
        match &self.routing {
            Some(routing) => Ok(routing.clone()),
            None => RoutingConfig::from_toml(DEFAULT_ROUTES).context("Failed to parse default routes"),
        }
    }

    /// Applies `HOST` / `PORT` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_routes_parse() {
        let config = Config::with_default_routes().unwrap();
        assert_eq!(config.server.port, 3000);

        let routing = config.routing().unwrap();
        assert_eq!(routing.root.as_deref(), Some("root"));
        assert_eq!(routing.resources.len(), 5);
    }

    #[test]
    fn test_server_section_only_uses_demo_routes() {
        let file = write_config(
            r#"
            [server]
            port = 8080
        "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.routing.is_none());
        assert_eq!(config.routing().unwrap().resources.len(), 5);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("traverse.toml")).unwrap();
        assert!(config.routing.is_none());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_routing_section_is_kept_without_resources() {
        let file = write_config(
            r#"
            [routing]
            root = "home"

            [[routing.paths]]
            resource = "home"
            handlers = ["describe"]
        "#,
        );
        let routing = Config::load(file.path()).unwrap().routing().unwrap();

        assert_eq!(routing.root.as_deref(), Some("home"));
        assert!(routing.resources.is_empty());
        assert_eq!(routing.paths.len(), 1);
        assert_eq!(routing.paths[0].resource, "home");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = write_config("[server\nport = 9000");
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_routing_section() {
        let toml = r#"
            [routing]
            root = "home"

            [routing.resources.home]
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let routing = config.routing.unwrap();
        assert_eq!(routing.root.as_deref(), Some("home"));
        assert!(routing.resources.contains_key("home"));
    }
}
