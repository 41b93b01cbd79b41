//! Service configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.chatping/` in
//! production) and deserializes it into [`ServiceConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use chatping_types::config::ServiceConfig;

/// Resolve the data directory: `CHATPING_DATA_DIR` if set, else
/// `~/.chatping`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATPING_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".chatping")
}

/// Load service configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_service_config(data_dir: &Path) -> ServiceConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServiceConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_service_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_service_config(tmp.path()).await;
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.naming.privileged_display_name, "Dr. Ali Kamal");
    }

    #[tokio::test]
    async fn load_service_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 9000

[push]
endpoint = "http://fcm.test"

[ingress]
bearer_token = "hook-token"
"#,
        )
        .await
        .unwrap();

        let config = load_service_config(tmp.path()).await;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.push.endpoint, "http://fcm.test");
        assert_eq!(config.ingress.bearer_token.as_deref(), Some("hook-token"));
        // Untouched sections keep their defaults
        assert_eq!(config.naming.fallback_display_name, "Someone");
    }

    #[tokio::test]
    async fn load_service_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_service_config(tmp.path()).await;
        assert_eq!(config.server.port, 8787);
    }
}
