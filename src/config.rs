//! Service configuration.
//!
//! A small TOML file configures the dataset to serve, project-specific
//! namespace prefixes added to every document, and the server bind address.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8100
}

/// Configuration for the provdal service.
///
/// ```toml
/// dataset = "data/rave.json"
/// bind = "127.0.0.1"
/// port = 8100
///
/// [namespaces]
/// rave = "http://www.rave-survey.org/prov/"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ProvDalConfig {
    /// Path to the JSON dataset file to serve.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    /// Extra namespace prefixes merged into every document's prefix table.
    #[serde(default)]
    pub namespaces: IndexMap<String, String>,
    /// Server bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ProvDalConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            namespaces: IndexMap::new(),
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ProvDalConfig {
    /// Load the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ProvDalConfig::default();
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.port, 8100);
        assert!(config.namespaces.is_empty());
        assert!(config.dataset.is_none());
    }

    #[test]
    fn parses_namespaces_table() {
        let config: ProvDalConfig = toml::from_str(
            r#"
            dataset = "data/rave.json"
            port = 9000

            [namespaces]
            rave = "http://www.rave-survey.org/prov/"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.namespaces["rave"], "http://www.rave-survey.org/prov/");
        assert_eq!(config.dataset.as_deref(), Some(Path::new("data/rave.json")));
    }
}
