use std::path::{Path, PathBuf};

use crate::config::schema::{Config, MAX_CACHE_TTL_SECS};
use crate::error::ConfigError;
use crate::submission::ReferenceNumber;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CIVIC_CONFIG";
/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads the file named by `CIVIC_CONFIG`, or the defaults when it is unset,
/// then applies the `PORT` override.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    let mut config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config(PathBuf::from(path))?,
        None => Config::default(),
    };

    if let Ok(port) = std::env::var(PORT_ENV) {
        config.server.port = port.trim().parse().map_err(|_| ConfigError::Validation {
            message: format!("{} must be a port number, got '{}'", PORT_ENV, port),
        })?;
    }

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if !ReferenceNumber::is_valid_prefix(&config.submission.reference_prefix) {
        return Err(ConfigError::Validation {
            message: format!(
                "Invalid reference prefix '{}'",
                config.submission.reference_prefix
            ),
        });
    }

    if config.geocoder.enabled && config.geocoder.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "geocoder.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.geocoder.cache_ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(ConfigError::Validation {
            message: format!(
                "geocoder.cache_ttl_secs must be at most {}",
                MAX_CACHE_TTL_SECS
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{DashboardSource, SubmissionMode};
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load_config_from_str(r#"{"version": "1.0"}"#).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.submission.mode, SubmissionMode::Simulated);
        assert_eq!(config.submission.simulated_delay_ms, 1500);
        assert_eq!(config.submission.reference_prefix, "DL-CIV");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.geocoder.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_full_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "database": { "path": "/var/lib/civic/civic.db" },
            "submission": {
                "mode": "store",
                "simulated_delay_ms": 0,
                "reference_prefix": "MUM-CIV",
                "reporter": "You"
            },
            "geocoder": {
                "enabled": false,
                "base_url": "http://localhost:8080",
                "timeout_secs": 3,
                "user_agent": "civic-test",
                "cache_ttl_secs": 0
            },
            "server": { "host": "127.0.0.1", "port": 8000, "dashboard": "store" },
            "logging": { "filter": "civic=debug", "json": true }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.submission.mode, SubmissionMode::Store);
        assert_eq!(config.submission.reporter.as_deref(), Some("You"));
        assert_eq!(
            config.database.resolved_path(),
            Some(PathBuf::from("/var/lib/civic/civic.db"))
        );
        assert!(!config.geocoder.enabled);
        assert_eq!(config.server.dashboard, DashboardSource::Store);
        assert!(config.logging.json);
    }

    #[test]
    fn test_schema_rejects_unknown_fields() {
        let result = load_config_from_str(r#"{"version": "1.0", "workers": 4}"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_schema_rejects_bad_values() {
        let bad = [
            r#"{"version": "2.0"}"#,
            r#"{"version": "1.0", "submission": {"mode": "carrier-pigeon"}}"#,
            r#"{"version": "1.0", "submission": {"reference_prefix": "dl-civ"}}"#,
            r#"{"version": "1.0", "server": {"port": 70000}}"#,
            r#"{"version": "1.0", "geocoder": {"base_url": "ftp://example.com"}}"#,
        ];
        for json in bad {
            assert!(
                matches!(
                    load_config_from_str(json),
                    Err(ConfigError::SchemaValidation { .. })
                ),
                "{}",
                json
            );
        }
    }

    #[test]
    fn test_oversized_cache_ttl_is_rejected() {
        let result =
            load_config_from_str(r#"{"version":"1.0","geocoder":{"cache_ttl_secs":99999999999}}"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));

        let config = load_config_from_str(
            r#"{"version":"1.0","geocoder":{"cache_ttl_secs":31536000}}"#,
        )
        .unwrap();
        assert_eq!(config.geocoder.cache_ttl_secs, MAX_CACHE_TTL_SECS);

        let mut config = Config::default();
        config.geocoder.cache_ttl_secs = MAX_CACHE_TTL_SECS + 1;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            load_config_from_str("{ not json"),
            Err(ConfigError::ParseJson(_))
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/nonexistent/civic.json");
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"version": "1.0", "server": {{"port": 9000}}}}"#).unwrap();

        std::env::set_var(CONFIG_ENV, file.path());
        std::env::remove_var(PORT_ENV);
        assert_eq!(load_config_from_env().unwrap().server.port, 9000);

        std::env::set_var(PORT_ENV, "9100");
        assert_eq!(load_config_from_env().unwrap().server.port, 9100);

        std::env::set_var(PORT_ENV, "http");
        assert!(matches!(
            load_config_from_env(),
            Err(ConfigError::Validation { .. })
        ));

        std::env::remove_var(PORT_ENV);
        std::env::remove_var(CONFIG_ENV);
        assert_eq!(load_config_from_env().unwrap(), Config::default());
    }
}
