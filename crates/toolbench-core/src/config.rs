use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{DigestAlgorithm, DnsProvider, HttpMethod, LogFormat};
use crate::{ToolbenchError, ToolbenchResult};

/// Top-level configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbenchConfig {
    pub logging: LoggingConfig,
    pub digest: DigestConfig,
    pub dns: DnsConfig,
    pub http: HttpConfig,
    pub random: RandomConfig,
}

impl ToolbenchConfig {
    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(s: &str) -> ToolbenchResult<Self> {
        toml::from_str(s).map_err(|e| ToolbenchError::Config(e.to_string()))
    }

    /// Load from `path`, or return defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> ToolbenchResult<Self> {
        if !path.exists() {
            tracing::warn!(
                "config file not found: {}  (using defaults)",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| ToolbenchError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_toml_string(&self) -> ToolbenchResult<String> {
        toml::to_string_pretty(self).map_err(|e| ToolbenchError::Config(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: LogFormat,
}

/// Checksum tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Algorithms computed when none is requested explicitly
    pub algorithms: Vec<DigestAlgorithm>,
    /// Files are buffered fully in memory; anything larger is refused
    pub max_file_bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsConfig {
    pub provider: DnsProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub method: HttpMethod,
    pub user_agent: String,
}

/// Random generator defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub default_length: usize,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Text,
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            algorithms: DigestAlgorithm::ALL.to_vec(),
            max_file_bytes: 512 * 1024 * 1024,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            method: HttpMethod::Head,
            user_agent: concat!("toolbench/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            default_length: 16,
            symbols: false,
            exclude_ambiguous: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[logging]
level = "debug"
format = "json"

[digest]
algorithms = ["SHA-256"]
max_file_bytes = 1048576

[dns]
provider = "cloudflare"

[http]
method = "get"
user_agent = "probe/1.0"

[random]
default_length = 32
symbols = true
exclude_ambiguous = true
"#;
        let config = ToolbenchConfig::from_toml_str(toml_str).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.digest.algorithms, vec![DigestAlgorithm::Sha256]);
        assert_eq!(config.digest.max_file_bytes, 1048576);
        assert_eq!(config.dns.provider, DnsProvider::Cloudflare);
        assert_eq!(config.http.method, HttpMethod::Get);
        assert_eq!(config.http.user_agent, "probe/1.0");
        assert_eq!(config.random.default_length, 32);
        assert!(config.random.symbols);
        assert!(config.random.exclude_ambiguous);
    }

    #[test]
    fn test_parse_defaults() {
        let config = ToolbenchConfig::from_toml_str("").unwrap();

        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.digest.algorithms, DigestAlgorithm::ALL.to_vec());
        assert_eq!(config.digest.max_file_bytes, 512 * 1024 * 1024);
        assert_eq!(config.dns.provider, DnsProvider::System);
        assert_eq!(config.http.method, HttpMethod::Head);
        assert!(config.http.user_agent.starts_with("toolbench/"));
        assert_eq!(config.random.default_length, 16);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[digest]
algorithms = ["sha1", "sha512"]
"#;
        let config = ToolbenchConfig::from_toml_str(toml_str).unwrap();

        // Overridden
        assert_eq!(
            config.digest.algorithms,
            vec![DigestAlgorithm::Sha1, DigestAlgorithm::Sha512]
        );
        // Defaults
        assert_eq!(config.digest.max_file_bytes, 512 * 1024 * 1024);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = ToolbenchConfig::from_toml_str("[dns]\nprovider = \"quad9\"\n").unwrap_err();
        assert!(matches!(err, ToolbenchError::Config(_)));
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = ToolbenchConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ToolbenchConfig::from_toml_str(&toml_str).unwrap();

        assert_eq!(config.digest.algorithms, parsed.digest.algorithms);
        assert_eq!(config.http.user_agent, parsed.http.user_agent);
        assert_eq!(config.dns.provider, parsed.dns.provider);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ToolbenchConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.random.default_length, 16);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[random]\ndefault_length = 8\n").unwrap();

        let config = ToolbenchConfig::load_or_default(&path).unwrap();
        assert_eq!(config.random.default_length, 8);
    }
}
