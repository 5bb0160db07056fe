//! Where Postboard keeps its files, and how `config.toml` is read.
//!
//! The data directory holds `postboard.db` and an optional `config.toml`.
//! A missing or broken config file never stops the server: it runs on
//! [`GlobalConfig::default()`] instead.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use postboard_types::config::GlobalConfig;

/// Overrides the data directory when set.
pub const DATA_DIR_ENV: &str = "POSTBOARD_DATA_DIR";

const DATA_DIR_NAME: &str = ".postboard";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "postboard.db";

/// `$POSTBOARD_DATA_DIR`, else `~/.postboard`, else `./.postboard`.
pub fn resolve_data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(DATA_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join(DATABASE_FILE).display())
}

pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let path = data_dir.join(CONFIG_FILE);

    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return GlobalConfig::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
            return GlobalConfig::default();
        }
    };

    toml::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "config invalid, using defaults");
        GlobalConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn config_from(contents: Option<&str>) -> GlobalConfig {
        let dir = TempDir::new().unwrap();
        if let Some(contents) = contents {
            tokio::fs::write(dir.path().join(CONFIG_FILE), contents).await.unwrap();
        }
        load_global_config(dir.path()).await
    }

    #[tokio::test]
    async fn test_missing_config_uses_defaults() {
        assert_eq!(config_from(None).await, GlobalConfig::default());
    }

    #[tokio::test]
    async fn test_partial_config_fills_in_defaults() {
        let config = config_from(Some("port = 9000\notel = true\n")).await;
        assert_eq!(config.port, 9000);
        assert!(config.otel);
        assert_eq!(config.host, GlobalConfig::default().host);
    }

    #[tokio::test]
    async fn test_broken_config_uses_defaults() {
        let config = config_from(Some("port = \"nine thousand\"")).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_database_url() {
        assert_eq!(
            database_url(Path::new("/srv/blog")),
            "sqlite:///srv/blog/postboard.db?mode=rwc"
        );
    }

    #[test]
    fn test_data_dir_env_override() {
        // SAFETY: no other test in this crate touches this variable.
        unsafe { std::env::set_var(DATA_DIR_ENV, "/tmp/postboard-env") };
        assert_eq!(resolve_data_dir(), PathBuf::from("/tmp/postboard-env"));
        unsafe { std::env::remove_var(DATA_DIR_ENV) };
        assert!(resolve_data_dir().ends_with(DATA_DIR_NAME));
    }
}
