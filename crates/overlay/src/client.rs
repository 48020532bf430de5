//! Client for the air-quality data service.

use std::time::Duration;

use async_trait::async_trait;
use aq_common::{
    anchor_for, AqError, DailyResponse, GridResponse, LatLon, Pollutant, SeriesResponse,
    SummaryResponse, TimeSeries, ViewportRect,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::{HistoryQuery, OverlayConfig};

const HEATMAP_PATH: &str = "/aqi/heatmap/smooth";
const TIMESERIES_PATH: &str = "/aqi/history/timeseries";
const DAILY_PATH: &str = "/aqi/history/daily";
const SUMMARY_PATH: &str = "/aqi/history/summary";

/// Heatmap request for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRequest {
    pub viewport: ViewportRect,
    pub sample_grid: u32,
    pub out_res: u32,
}

impl GridRequest {
    pub fn new(viewport: ViewportRect, config: &OverlayConfig) -> Self {
        Self {
            viewport,
            sample_grid: config.sample_grid,
            out_res: config.out_res,
        }
    }

    /// Query parameters, corners normalized to south-west / north-east.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let rect = anchor_for(&self.viewport);
        vec![
            ("lat1", rect.south_west.lat.to_string()),
            ("lon1", rect.south_west.lon.to_string()),
            ("lat2", rect.north_east.lat.to_string()),
            ("lon2", rect.north_east.lon.to_string()),
            ("sample_grid", self.sample_grid.to_string()),
            ("out_res", self.out_res.to_string()),
        ]
    }
}

/// The three history payloads for one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBundle {
    pub series: SeriesResponse,
    pub daily: DailyResponse,
    pub summary: SummaryResponse,
}

impl HistoryBundle {
    /// Data source label: the first one reported by series, daily or
    /// summary, in that order.
    pub fn source(&self) -> &str {
        self.series
            .source
            .as_deref()
            .or(self.daily.source.as_deref())
            .or(self.summary.source.as_deref())
            .unwrap_or("unknown")
    }

    pub fn time_series(&self, pollutant: Pollutant) -> TimeSeries {
        TimeSeries::from_records(&self.series.series, pollutant)
    }
}

/// Source of heatmap grids.
#[async_trait]
pub trait GridSource: Send + Sync {
    async fn fetch_grid(&self, request: &GridRequest) -> Result<GridResponse, AqError>;
}

/// Source of per-location history.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    async fn fetch_history(
        &self,
        location: LatLon,
        query: &HistoryQuery,
    ) -> Result<HistoryBundle, AqError>;
}

/// HTTP implementation of both sources.
#[derive(Debug, Clone)]
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

impl HttpDataService {
    pub fn new(config: &OverlayConfig) -> Result<Self, AqError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| AqError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(StatusCode, Vec<u8>), AqError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "Data service responded");
        Ok((status, body.to_vec()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AqError> {
        let (status, body) = self.get(path, query).await?;
        if !status.is_success() {
            return Err(AqError::HttpStatus(status.as_u16()));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

fn transport_error(err: reqwest::Error) -> AqError {
    if err.is_timeout() {
        AqError::Timeout
    } else {
        AqError::Transport(err.to_string())
    }
}

#[async_trait]
impl GridSource for HttpDataService {
    #[instrument(skip(self), fields(sample_grid = request.sample_grid, out_res = request.out_res))]
    async fn fetch_grid(&self, request: &GridRequest) -> Result<GridResponse, AqError> {
        let (status, body) = self.get(HEATMAP_PATH, &request.query()).await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        // Failed requests may still explain themselves in an `error` field
        match serde_json::from_slice::<GridResponse>(&body) {
            Ok(GridResponse {
                error: Some(message),
                ..
            }) => {
                warn!(status = status.as_u16(), error = %message, "Heatmap request rejected");
                Err(AqError::Service(message))
            }
            _ => Err(AqError::HttpStatus(status.as_u16())),
        }
    }
}

#[async_trait]
impl SeriesSource for HttpDataService {
    #[instrument(
        skip(self, query),
        fields(lat = location.lat, lon = location.lon, days = query.days)
    )]
    async fn fetch_history(
        &self,
        location: LatLon,
        query: &HistoryQuery,
    ) -> Result<HistoryBundle, AqError> {
        let base = [
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
            ("days", query.days.to_string()),
        ];
        let mut series_query = base.to_vec();
        series_query.push(("rolling_window", query.rolling_window.to_string()));
        series_query.push(("radius_km", query.radius_km.to_string()));

        let (series, daily, summary) = futures::try_join!(
            self.get_json::<SeriesResponse>(TIMESERIES_PATH, &series_query),
            self.get_json::<DailyResponse>(DAILY_PATH, &base),
            self.get_json::<SummaryResponse>(SUMMARY_PATH, &base),
        )?;

        debug!(records = series.series.len(), "Fetched history");
        Ok(HistoryBundle {
            series,
            daily,
            summary,
        })
    }
}
