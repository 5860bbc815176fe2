//! Application configuration management.
//!
//! This module handles loading and merging configuration from multiple sources
//! with a clear precedence order. Configuration can come from default values,
//! configuration files, and environment variables.

use crate::Cli;
use serde::{Deserialize, Serialize};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Web server configuration (bind address, page sizes, link origin)
    #[serde(default)]
    pub server: apr_axum::config::AxumConfig,

    /// Database configuration (file path, busy timeout)
    #[serde(default)]
    pub database: apr_sqlite::config::SqliteConfig,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `APP_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Keep the aggregates in a file
    /// export APP_DATABASE__DATABASE_PATH="/data/aggregates.db"
    ///
    /// # Set server bind address
    /// export APP_SERVER__BIND_ADDRESS="0.0.0.0:3000"
    ///
    /// # Allow larger pages
    /// export APP_SERVER__MAX_PAGE_LIMIT=5000
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // This maps APP_SERVER__BIND_ADDRESS to server.bind_address
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_without_file() {
        let cli = Cli {
            config: None,
            command: None,
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.page_limit, 200);
        assert_eq!(config.server.max_page_limit, 1000);
        assert_eq!(config.database.database_path, None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/aprdemo.toml")),
            command: None,
        };
        assert!(AppConfig::load(&cli).is_err());
    }
}
