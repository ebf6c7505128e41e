//! Configuration Management
//!
//! Handles persistent configuration storage for the `fortios` CLI.

use crate::fortios::auth::ApiToken;
use crate::fortios::client::ClientConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Appliance base URL, e.g. `https://192.0.2.1`
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub vdom: Option<String>,
    /// Accept self-signed certificates
    #[serde(default)]
    pub insecure: bool,
    /// API token. Only ever set by editing the file; kept as-is on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fortios").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Build client settings; explicit arguments win over saved values
    pub fn client_config(
        &self,
        host: Option<&str>,
        vdom: Option<&str>,
        insecure: bool,
        token: Option<ApiToken>,
    ) -> Result<ClientConfig> {
        let host = host
            .or(self.host.as_deref())
            .context("No FortiOS host configured. Set FORTIOS_HOST or use --host")?;

        let mut config = ClientConfig::new(host)
            .with_context(|| format!("Invalid FortiOS host '{host}'"))?
            .insecure(insecure || self.insecure);

        if let Some(vdom) = vdom.or(self.vdom.as_deref()) {
            config = config.with_vdom(vdom);
        }
        if let Some(token) = token {
            config = config.with_token(token);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("fortios-cmdb-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = temp_config_path("missing");
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_config_path("roundtrip");
        let config = Config {
            host: Some("https://192.0.2.1".into()),
            vdom: Some("root".into()),
            insecure: true,
            token: None,
        };
        config.save_to(&path).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("token"));
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_explicit_host_wins() {
        let config = Config {
            host: Some("https://saved.example.net".into()),
            vdom: Some("root".into()),
            ..Default::default()
        };
        let client = config
            .client_config(Some("https://192.0.2.9"), Some("dmz"), false, None)
            .unwrap();
        assert_eq!(client.base_url.as_str(), "https://192.0.2.9/");
        assert_eq!(client.vdom.as_deref(), Some("dmz"));
        assert!(!client.insecure);
    }

    #[test]
    fn test_no_host_is_an_error() {
        let err = Config::default()
            .client_config(None, None, false, None)
            .unwrap_err();
        assert!(err.to_string().contains("No FortiOS host configured"));
    }
}
