//! Viewer configuration: overlay, chart and history settings in one file.

use std::path::Path;

use anyhow::{Context, Result};
use chart::ChartConfig;
use overlay::{HistoryQuery, OverlayConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub overlay: OverlayConfig,
    pub chart: ChartConfig,
    pub history: HistoryQuery,
}

impl ViewerConfig {
    /// Load from an optional YAML file, then apply `AQ_*` environment
    /// overrides and an explicit API URL, and validate.
    pub fn load(path: Option<&Path>, api_url: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_yaml::from_str(&yaml)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.overlay.apply_env()?;
        if let Some(url) = api_url {
            config.overlay.base_url = url.to_string();
        }

        config.overlay.validate()?;
        config.chart.validate()?;
        Ok(config)
    }
}
