//! Configuration for the plugin host
//!
//! Plugins are declared in TOML sections:
//!
//! ```toml
//! [plugin-host]
//! enabled = true
//!
//! [plugin-host.plugins.py-demo]
//! command = "python3"
//! args = ["-u", "./plugins/demo.py"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Trait for typed configuration sections.
pub trait Configurable: DeserializeOwned + Default {
    /// TOML section name the type is read from.
    const PREFIX: &'static str;
}

/// TOML-backed configuration store.
pub struct ConfigStore {
    data: toml::Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigStore {
    pub fn empty() -> Self {
        Self {
            data: toml::Value::Table(Default::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let data: toml::Value =
            toml::from_str(content).map_err(|e| anyhow!("failed to parse TOML: {e}"))?;
        Ok(Self { data })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file '{}': {e}", path.display()))?;
        Self::parse(&content)
    }

    /// Get a typed section; a missing section yields the default value.
    pub fn get<C: Configurable>(&self) -> Result<C> {
        let section = self
            .data
            .get(C::PREFIX)
            .cloned()
            .unwrap_or(toml::Value::Table(Default::default()));

        section
            .try_into()
            .map_err(|e| anyhow!("failed to deserialize config section '{}': {e}", C::PREFIX))
    }
}

/// Plugin host configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct HostConfig {
    /// Whether the host starts any plugins at all
    #[serde(default)]
    pub enabled: bool,

    /// Plugin name to spawn configuration
    #[serde(default)]
    pub plugins: HashMap<String, PluginConfig>,
}

impl Configurable for HostConfig {
    const PREFIX: &'static str = "plugin-host";
}

/// Spawn configuration for a single plugin
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Command to run (e.g. "python3", "bun", "./plugin")
    pub command: String,

    /// Arguments to pass to the command
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the plugin
    #[serde(default)]
    pub cwd: Option<String>,

    /// Environment variables to set
    #[serde(default)]
    pub env: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_section_is_default() {
        let store = ConfigStore::empty();
        let config: HostConfig = store.get().unwrap();
        assert!(!config.enabled);
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_parse_plugin_sections() {
        let toml = r#"
            [plugin-host]
            enabled = true

            [plugin-host.plugins.py-demo]
            command = "python3"
            args = ["-u", "./plugins/demo.py"]

            [plugin-host.plugins.js-demo]
            command = "bun"
            args = ["run", "./plugins/demo.ts"]
            cwd = "/srv/plugins"

            [plugin-host.plugins.js-demo.env]
            DEMO_MODE = "1"
        "#;

        let store = ConfigStore::parse(toml).unwrap();
        let config: HostConfig = store.get().unwrap();
        assert!(config.enabled);
        assert_eq!(config.plugins.len(), 2);

        let py = &config.plugins["py-demo"];
        assert_eq!(py.command, "python3");
        assert_eq!(py.args, ["-u", "./plugins/demo.py"]);
        assert!(py.cwd.is_none());

        let js = &config.plugins["js-demo"];
        assert_eq!(js.cwd.as_deref(), Some("/srv/plugins"));
        assert_eq!(js.env["DEMO_MODE"], "1");
    }

    #[test]
    fn test_command_is_required() {
        let toml = r#"
            [plugin-host.plugins.broken]
            args = ["x"]
        "#;
        let store = ConfigStore::parse(toml).unwrap();
        assert!(store.get::<HostConfig>().is_err());
    }
}
