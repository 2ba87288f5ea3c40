//! Client configuration loading from a TOML file, with defaults.

use pactsign_types::config::ClientConfig;
use std::path::Path;
use tracing::{info, warn};

/// Load client configuration from a TOML file.
///
/// A missing path, an unreadable file or invalid TOML all fall back to
/// defaults (no host configured) with a log line saying why.
pub fn load_config(path: Option<&Path>) -> ClientConfig {
    let Some(config_path) = path else {
        return ClientConfig::default();
    };

    if !config_path.exists() {
        info!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        return ClientConfig::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<ClientConfig>(&contents) {
            Ok(config) => {
                info!(
                    path = %config_path.display(),
                    host = config.host.as_deref().unwrap_or("<unset>"),
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %config_path.display(),
                    "Failed to parse config, using defaults"
                );
                ClientConfig::default()
            }
        },
        Err(e) => {
            warn!(
                error = %e,
                path = %config_path.display(),
                "Failed to read config file, using defaults"
            );
            ClientConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pactsign_types::config::DEFAULT_WALLET_URL;
    use std::io::Write;

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_config(None);
        assert_eq!(config, ClientConfig::default());
        assert!(config.host.is_none());
        assert_eq!(config.wallet_url, DEFAULT_WALLET_URL);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"http://localhost:8080\"").unwrap();
        writeln!(file, "network_id = \"development\"").unwrap();

        let config = load_config(Some(file.path()));
        assert_eq!(config.host.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.network_id.as_deref(), Some("development"));
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.wallet_url, DEFAULT_WALLET_URL);
    }

    #[test]
    fn test_timeout_is_opt_in() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();
        assert_eq!(load_config(Some(file.path())).request_timeout_secs, Some(5));
    }

    #[test]
    fn test_invalid_toml_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = [not toml").unwrap();
        assert_eq!(load_config(Some(file.path())), ClientConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml")));
        assert_eq!(config, ClientConfig::default());
    }
}
