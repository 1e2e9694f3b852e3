use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Required sections exist (enforced by serde)
/// - Server port is not 0
/// - Dataset base URL and API key are non-empty
/// - Top-N count is at least 1
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.dataset.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "dataset.base_url cannot be empty".to_string(),
        ));
    }

    if config.metadata.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "metadata.api_key cannot be empty".to_string(),
        ));
    }

    if config.selector.top_count == 0 {
        return Err(ConfigError::ValidationError(
            "selector.top_count must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
[dataset]
base_url = "https://movies.example.com"

[queue]
spool_dir = "/tmp/spool"

[metadata]
api_key = "k"

[store]
root_dir = "/tmp/out"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_base_url_fails() {
        let mut config = valid_config();
        config.dataset.base_url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = valid_config();
        config.metadata.api_key = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_top_count_fails() {
        let mut config = valid_config();
        config.selector.top_count = 0;
        assert!(validate_config(&config).is_err());
    }
}
