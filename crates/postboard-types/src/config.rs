//! Global configuration types for Postboard.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory. Every field has a default so a missing or partial file works.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Address the API server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built web frontend. Served as an SPA when present.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8910
}

fn default_web_dir() -> String {
    "web/dist".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            web_dir: default_web_dir(),
            otel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8910);
        assert!(!config.otel);
    }

    #[test]
    fn test_global_config_partial_toml() {
        let config: GlobalConfig = toml::from_str("port = 9000\notel = true\n").unwrap();
        assert_eq!(config.port, 9000);
        assert!(config.otel);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.web_dir, "web/dist");
    }

    #[test]
    fn test_global_config_empty_toml() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }
}
