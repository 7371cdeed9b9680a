//! Application configuration
//!
//! Loaded from environment variables with the `KPI_TRACKER` prefix and `__`
//! as the nesting separator, after reading a `.env` file when one exists.
//!
//! - `KPI_TRACKER__DATA_PATH=indicators.json`
//! - `KPI_TRACKER__FISCAL_YEAR=2569`
//! - `KPI_TRACKER__TIMEFRAME=ภาพรวม (สะสม)`
//! - `KPI_TRACKER__EXPORT_DIR=.`
//! - `KPI_TRACKER__LOG_FILTER=info`

use crate::catalog::{is_known_timeframe, CUMULATIVE_TIMEFRAME};
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file backing the indicators table.
    pub data_path: PathBuf,
    /// Fiscal year selected at startup (Buddhist era, e.g. 2569).
    pub fiscal_year: String,
    /// Timeframe selected at startup.
    pub timeframe: String,
    /// Directory for CSV/JSON exports.
    pub export_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: PathBuf::from("indicators.json"),
            fiscal_year: "2569".to_string(),
            timeframe: CUMULATIVE_TIMEFRAME.to_string(),
            export_dir: PathBuf::from("."),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `.env` and the process environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("KPI_TRACKER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        Self::from_config(source)
    }

    /// Deserialize an already assembled configuration, then validate.
    pub fn from_config(source: config::Config) -> Result<Self, ConfigError> {
        let cfg: AppConfig = source.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fiscal_year.is_empty() || !self.fiscal_year.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Validation(format!(
                "fiscal_year must be digits, got {:?}",
                self.fiscal_year
            )));
        }
        if !is_known_timeframe(&self.timeframe) {
            return Err(ConfigError::Validation(format!(
                "unknown timeframe {:?}",
                self.timeframe
            )));
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("data_path is empty".to_string()));
        }
        Ok(())
    }
}
