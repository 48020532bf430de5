//! Wire formats returned by the air-quality data service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AqError;
use crate::grid::Grid;
use crate::series::{self, Pollutant};

/// Response of the heatmap endpoint.
///
/// `error` marks a service-reported failure; `grid_aqi` is then optional.
/// `note` is advisory and surfaced whenever present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridResponse {
    #[serde(default)]
    pub grid_aqi: Option<Vec<Vec<Option<f64>>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_lats: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_lons: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GridResponse {
    /// Validate the carried grid.
    pub fn grid(&self) -> Result<Grid, AqError> {
        let rows = self
            .grid_aqi
            .as_ref()
            .ok_or_else(|| AqError::MalformedPayload("response carries no grid_aqi".to_string()))?;
        Ok(Grid::from_rows(rows)?)
    }
}

/// One record of the history time-series endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(with = "series::iso8601")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub aqi: Option<f64>,
    #[serde(default)]
    pub pm25: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
    #[serde(default)]
    pub so2: Option<f64>,
    #[serde(default)]
    pub co: Option<f64>,
    #[serde(default)]
    pub o3: Option<f64>,
}

impl SeriesRecord {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Aqi => self.aqi,
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
            Pollutant::O3 => self.o3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub series: Vec<SeriesRecord>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Daily aggregates, displayed as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyResponse {
    #[serde(default)]
    pub daily: Vec<serde_json::Value>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Summary statistics, displayed as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<serde_json::Value>,
    #[serde(default)]
    pub source: Option<String>,
}
