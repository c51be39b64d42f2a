//! Configuration types and loading

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Query engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Upper bound on the number of rows a single page may return
    #[serde(default)]
    pub max_page_size: Option<usize>,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl QueryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(size) = lookup("DYNQ_MAX_PAGE_SIZE") {
            let size = size.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                key: "DYNQ_MAX_PAGE_SIZE".to_string(),
                message: e.to_string(),
            })?;
            config.max_page_size = Some(size);
        }

        if let Some(level) = lookup("DYNQ_LOG_LEVEL") {
            config.log.level = level;
        }

        if let Some(format) = lookup("DYNQ_LOG_FORMAT") {
            config.log.format =
                LogFormat::from_str(&format).ok_or_else(|| ConfigError::InvalidValue {
                    key: "DYNQ_LOG_FORMAT".to_string(),
                    message: format!("unknown log format '{}'", format),
                })?;
        }

        Ok(config)
    }
}
