//! Overlay controller and data-service configuration.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("base_url must be an http(s) URL, got {0}")]
    BaseUrl(String),
}

/// Settings for the viewport overlay and its data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Root URL of the air-quality data service.
    pub base_url: String,
    /// Quiet period after the last viewport event before fetching.
    pub debounce_ms: u64,
    /// Server-side sampling density hint.
    pub sample_grid: u32,
    /// Server-side output resolution hint.
    pub out_res: u32,
    /// Opacity the map display composites the raster with.
    pub opacity: f64,
    pub request_timeout_secs: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce_ms: 650,
            sample_grid: 5,
            out_res: 80,
            opacity: 0.55,
            request_timeout_secs: 30,
        }
    }
}

impl OverlayConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Defaults overridden by `AQ_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `AQ_API_URL`, `AQ_DEBOUNCE_MS`, `AQ_OPACITY`,
    /// `AQ_SAMPLE_GRID` and `AQ_OUT_RES` when set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("AQ_API_URL") {
            self.base_url = url;
        }
        if let Some(v) = env_parse("AQ_DEBOUNCE_MS")? {
            self.debounce_ms = v;
        }
        if let Some(v) = env_parse("AQ_OPACITY")? {
            self.opacity = v;
        }
        if let Some(v) = env_parse("AQ_SAMPLE_GRID")? {
            self.sample_grid = v;
        }
        if let Some(v) = env_parse("AQ_OUT_RES")? {
            self.out_res = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.base_url.clone()));
        }
        check_range("sample_grid", self.sample_grid as f64, 3.0, 11.0)?;
        check_range("out_res", self.out_res as f64, 40.0, 200.0)?;
        check_range("opacity", self.opacity, 0.0, 1.0)?;
        check_range("debounce_ms", self.debounce_ms as f64, 0.0, 60_000.0)?;
        check_range("request_timeout_secs", self.request_timeout_secs as f64, 1.0, 600.0)?;
        Ok(())
    }
}

/// Window of history requested for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub days: u32,
    pub rolling_window: u32,
    pub radius_km: f64,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            days: 30,
            rolling_window: 5,
            radius_km: 10.0,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        Err(_) => Ok(None),
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = OverlayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(650));
        assert_eq!(config.opacity, 0.55);
    }

    #[test]
    fn test_yaml_partial_override() {
        let config = OverlayConfig::from_yaml_str("debounce_ms: 300\nout_res: 120\n").unwrap();
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.out_res, 120);
        assert_eq!(config.sample_grid, 5);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = OverlayConfig::from_yaml_str("sample_grid: 2").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "sample_grid", .. }));

        let err = OverlayConfig::from_yaml_str("opacity: 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "opacity", .. }));
    }

    #[test]
    fn test_bad_url_rejected() {
        let err = OverlayConfig::from_yaml_str("base_url: ftp://example.org").unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl(_)));
    }
}
