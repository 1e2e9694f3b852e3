use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub queue: QueueConfig,
    pub metadata: MetadataConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Ranked dataset source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Base URL of the public dataset location (e.g. a bucket website endpoint)
    pub base_url: String,
    /// Object key appended to the base URL
    #[serde(default = "default_object_key")]
    pub object_key: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_object_key() -> String {
    "Top250Movies.json".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// Queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Spool directory holding one file per in-flight message
    pub spool_dir: PathBuf,
}

/// Metadata API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// API key passed on every lookup
    pub api_key: String,
    /// Base URL (default: https://www.omdbapi.com)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Blob store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Root directory enriched records are written under
    pub root_dir: PathBuf,
    /// Prefix keys with the current UTC date (`YYYY-MM-DD/`)
    #[serde(default = "default_date_partition")]
    pub date_partition: bool,
}

fn default_date_partition() -> bool {
    true
}

/// Selector configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectorConfig {
    /// How many top-rated entries to publish
    #[serde(default = "default_top_count")]
    pub top_count: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_count: default_top_count(),
        }
    }
}

fn default_top_count() -> usize {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub queue: QueueConfig,
    pub metadata: SanitizedMetadataConfig,
    pub store: StoreConfig,
    pub selector: SelectorConfig,
}

/// Sanitized metadata config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMetadataConfig {
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            dataset: config.dataset.clone(),
            queue: config.queue.clone(),
            metadata: SanitizedMetadataConfig {
                api_key_configured: !config.metadata.api_key.is_empty(),
                base_url: config.metadata.base_url.clone(),
                timeout_secs: config.metadata.timeout_secs,
            },
            store: config.store.clone(),
            selector: config.selector.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
[dataset]
base_url = "https://movies.example.com"

[queue]
spool_dir = "/var/spool/marquee"

[metadata]
api_key = "secret-key"

[store]
root_dir = "/var/lib/marquee/enriched"
"#
    }

    #[test]
    fn test_deserialize_minimal_config_applies_defaults() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.dataset.object_key, "Top250Movies.json");
        assert_eq!(config.dataset.timeout_secs, 10);
        assert_eq!(config.selector.top_count, 10);
        assert!(config.store.date_partition);
    }

    #[test]
    fn test_deserialize_with_overrides() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[dataset]
base_url = "https://movies.example.com"
object_key = "Top100Movies.json"

[queue]
spool_dir = "/tmp/spool"

[metadata]
api_key = "k"
base_url = "http://localhost:9200"
timeout_secs = 3

[store]
root_dir = "/tmp/out"
date_partition = false

[selector]
top_count = 25
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.dataset.object_key, "Top100Movies.json");
        assert_eq!(
            config.metadata.base_url.as_deref(),
            Some("http://localhost:9200")
        );
        assert_eq!(config.metadata.timeout_secs, 3);
        assert!(!config.store.date_partition);
        assert_eq!(config.selector.top_count, 25);
    }

    #[test]
    fn test_deserialize_missing_dataset_fails() {
        let toml = r#"
[queue]
spool_dir = "/tmp/spool"

[metadata]
api_key = "k"

[store]
root_dir = "/tmp/out"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_redacts_api_key() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.metadata.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
