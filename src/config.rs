//! Configuration module for the haystackd server.
//!
//! Supports both command-line arguments and TOML configuration file.
//! CLI arguments take precedence over config file values.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

use crate::matcher::Algorithm;

/// Command-line arguments for the search server
#[derive(Parser, Debug)]
#[command(name = "haystackd")]
#[command(version = "0.1.0")]
#[command(about = "A concurrent line-search server", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to (e.g., 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the dataset file
    #[arg(short, long)]
    pub dataset_path: Option<PathBuf>,

    /// Reread the dataset on every query instead of caching it once
    #[arg(long)]
    pub reread_on_query: Option<bool>,

    /// Matching algorithm (linear, sorted-binary, kmp, boyer-moore,
    /// rabin-karp, z-algorithm)
    #[arg(short, long)]
    pub algorithm: Option<String>,

    /// Enable TLS on accepted connections
    #[arg(long)]
    pub tls: Option<bool>,

    /// Path to the PEM server certificate (required with TLS)
    #[arg(long)]
    pub cert_path: Option<PathBuf>,

    /// Path to the PEM private key (required with TLS)
    #[arg(long)]
    pub key_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub server: ServerTable,
    #[serde(default)]
    pub tls: TlsClientTable,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset-related configuration
#[derive(Debug, Deserialize)]
pub struct SettingsConfig {
    /// Path to the dataset file
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Reread the dataset on every query
    #[serde(default = "default_reread_on_query")]
    pub reread_on_query: bool,
    /// Matching algorithm name
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            reread_on_query: default_reread_on_query(),
            algorithm: default_algorithm(),
        }
    }
}

/// Server-related configuration
#[derive(Debug, Deserialize)]
pub struct ServerTable {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub tls_enabled: bool,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

impl Default for ServerTable {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls_enabled: false,
            cert_path: None,
            key_path: None,
        }
    }
}

/// Client-side TLS verification settings, read by the query client
#[derive(Debug, Deserialize)]
pub struct TlsClientTable {
    /// Verify the server certificate against a CA bundle
    #[serde(default = "default_tls_verify")]
    pub verify: bool,
    /// CA bundle path; for self-signed deployments, the server certificate
    pub ca_path: Option<PathBuf>,
}

impl Default for TlsClientTable {
    fn default() -> Self {
        Self {
            verify: default_tls_verify(),
            ca_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("200k.txt")
}

fn default_reread_on_query() -> bool {
    true
}

fn default_algorithm() -> String {
    "linear".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    12345
}

fn default_tls_verify() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Final resolved configuration, immutable once the server starts
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dataset_path: PathBuf,
    pub reread_on_query: bool,
    pub algorithm: Algorithm,
    pub tls_enabled: bool,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
    pub tls_verify: bool,
    pub ca_path: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from CLI args and optional TOML file.
    /// CLI arguments take precedence over TOML file values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(CliArgs::parse())
    }

    pub fn resolve(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = match cli.config {
            Some(ref path) => load_toml(path)?,
            None => TomlConfig::default(),
        };

        let algorithm_name = cli.algorithm.unwrap_or(toml_config.settings.algorithm);
        let algorithm: Algorithm = algorithm_name
            .parse()
            .map_err(|_| ConfigError::UnknownAlgorithm(algorithm_name))?;

        let config = Config {
            host: cli.host.unwrap_or(toml_config.server.host),
            port: cli.port.unwrap_or(toml_config.server.port),
            dataset_path: cli.dataset_path.unwrap_or(toml_config.settings.dataset_path),
            reread_on_query: cli
                .reread_on_query
                .unwrap_or(toml_config.settings.reread_on_query),
            algorithm,
            tls_enabled: cli.tls.unwrap_or(toml_config.server.tls_enabled),
            cert_path: cli.cert_path.or(toml_config.server.cert_path),
            key_path: cli.key_path.or(toml_config.server.key_path),
            tls_verify: toml_config.tls.verify,
            ca_path: toml_config.tls.ca_path,
            log_level: if cli.log_level != "info" {
                cli.log_level
            } else {
                toml_config.logging.level
            },
        };

        if config.tls_enabled && (config.cert_path.is_none() || config.key_path.is_none()) {
            return Err(ConfigError::MissingTlsCredentials);
        }

        Ok(config)
    }
}

/// Read and parse a TOML configuration file.
pub fn load_toml(path: &std::path::Path) -> Result<TomlConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::TomlParse(path.to_path_buf(), e))
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    FileRead(PathBuf, std::io::Error),
    TomlParse(PathBuf, toml::de::Error),
    UnknownAlgorithm(String),
    MissingTlsCredentials,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::TomlParse(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::UnknownAlgorithm(name) => {
                write!(f, "Unknown matching algorithm '{name}'")
            }
            ConfigError::MissingTlsCredentials => {
                write!(f, "TLS is enabled but cert_path or key_path is missing")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_defaults() -> CliArgs {
        CliArgs {
            config: None,
            host: None,
            port: None,
            dataset_path: None,
            reread_on_query: None,
            algorithm: None,
            tls: None,
            cert_path: None,
            key_path: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::resolve(cli_defaults()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 12345);
        assert_eq!(config.dataset_path, PathBuf::from("200k.txt"));
        assert!(config.reread_on_query);
        assert_eq!(config.algorithm, Algorithm::Linear);
        assert!(!config.tls_enabled);
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [settings]
            dataset_path = "/var/lib/haystackd/200k.txt"
            reread_on_query = false
            algorithm = "kmp"

            [server]
            host = "0.0.0.0"
            port = 9000
            tls_enabled = true
            cert_path = "server.crt"
            key_path = "server.key"

            [tls]
            verify = false

            [logging]
            level = "debug"
        "#;

        let config: TomlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.settings.dataset_path,
            PathBuf::from("/var/lib/haystackd/200k.txt")
        );
        assert!(!config.settings.reread_on_query);
        assert_eq!(config.settings.algorithm, "kmp");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(config.server.tls_enabled);
        assert!(!config.tls.verify);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_cli_overrides_toml_defaults() {
        let mut cli = cli_defaults();
        cli.port = Some(4000);
        cli.algorithm = Some("rabin-karp".to_string());
        cli.reread_on_query = Some(false);

        let config = Config::resolve(cli).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.algorithm, Algorithm::RabinKarp);
        assert!(!config.reread_on_query);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let mut cli = cli_defaults();
        cli.algorithm = Some("quantum".to_string());
        assert!(matches!(
            Config::resolve(cli),
            Err(ConfigError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_tls_requires_credentials() {
        let mut cli = cli_defaults();
        cli.tls = Some(true);
        assert!(matches!(
            Config::resolve(cli),
            Err(ConfigError::MissingTlsCredentials)
        ));

        let mut cli = cli_defaults();
        cli.tls = Some(true);
        cli.cert_path = Some(PathBuf::from("server.crt"));
        cli.key_path = Some(PathBuf::from("server.key"));
        assert!(Config::resolve(cli).is_ok());
    }
}
