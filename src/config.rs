use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, time::Duration};
use umami_catalog::{Paging, SimilarityMode};

use crate::observability::LogFormat;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub composition: CompositionConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Trigram similarity search; substring matching only when disabled.
    #[serde(default = "default_trigram")]
    pub trigram: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            trigram: default_trigram(),
        }
    }
}

impl CatalogConfig {
    pub fn paging(&self) -> Paging {
        Paging {
            default_size: self.default_page_size,
            max_size: self.max_page_size,
        }
    }

    pub fn similarity_mode(&self) -> SimilarityMode {
        if self.trigram {
            SimilarityMode::Trigram
        } else {
            SimilarityMode::SubstringOnly
        }
    }
}

fn default_page_size() -> u32 {
    24
}

fn default_max_page_size() -> u32 {
    100
}

fn default_trigram() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompositionConfig {
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl CompositionConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

fn default_lookup_timeout_ms() -> u64 {
    2000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Picked from `ENVIRONMENT` when unset.
    #[serde(default)]
    pub log_format: Option<LogFormat>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. DATABASE_URL
    /// 2. Environment variables (UMAMI__DATABASE__URL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:umami.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("UMAMI")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.catalog.default_page_size == 0 || self.catalog.max_page_size == 0 {
            return Err("Catalog page sizes must be greater than 0".to_string());
        }
        if self.catalog.default_page_size > self.catalog.max_page_size {
            return Err(format!(
                "Catalog default_page_size ({}) exceeds max_page_size ({})",
                self.catalog.default_page_size, self.catalog.max_page_size
            ));
        }
        if self.composition.lookup_timeout_ms == 0 {
            return Err("Composition lookup_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            catalog: CatalogConfig::default(),
            composition: CompositionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_page_sizes() {
        let mut config = config();
        config.catalog.default_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = self::config();
        config.catalog.default_page_size = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = config();
        config.composition.lookup_timeout_ms = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_catalog_settings() {
        let mut catalog = CatalogConfig::default();
        assert_eq!(catalog.paging(), Paging::default());
        assert_eq!(catalog.similarity_mode(), SimilarityMode::Trigram);

        catalog.trigram = false;
        assert_eq!(catalog.similarity_mode(), SimilarityMode::SubstringOnly);
    }
}
