//! Configuration management for the token ledger

use crate::crypto::{resolve_address, Address, NULL_ADDRESS};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "tokenledger.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Contract owner: 64-hex address or a label hashed into one.
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_call_size")]
    pub max_call_size: usize,
    /// Number of receipts kept by the host before the oldest are dropped.
    #[serde(default = "default_receipt_history")]
    pub receipt_history: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_call_size: default_max_call_size(),
            receipt_history: default_receipt_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    pub fn owner_address(&self) -> Address {
        resolve_address(&self.ledger.owner)
    }

    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.logging.level)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_address() == NULL_ADDRESS {
            return Err(ConfigError::Invalid(
                "ledger.owner must not be the null address".to_string(),
            ));
        }
        if self.ledger.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("ledger.symbol must be set".to_string()));
        }
        if self.limits.max_call_size == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_call_size must be greater than zero".to_string(),
            ));
        }
        self.log_level()?;
        Ok(())
    }
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

/// Loads `path`, falling back to defaults when the file does not exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(config_str) => parse_config(&config_str),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_PATH))
}

fn default_owner() -> String {
    "owner".to_string()
}

fn default_name() -> String {
    "Ledger Token".to_string()
}

fn default_symbol() -> String {
    "LDG".to_string()
}

fn default_decimals() -> u8 {
    18
}

fn default_max_call_size() -> usize {
    crate::call::MAX_CALL_SIZE
}

fn default_receipt_history() -> usize {
    1_024
}

fn default_level() -> String {
    "info".to_string()
}
