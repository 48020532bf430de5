//! Common types and utilities shared across the air-quality overlay crates.

pub mod category;
pub mod error;
pub mod geo;
pub mod grid;
pub mod payload;
pub mod series;

pub use category::AqiBand;
pub use error::{AqError, AqResult};
pub use geo::{anchor_for, GeoError, GeoRect, LatLon, ViewportRect};
pub use grid::{Grid, GridError, MAX_GRID_CELLS, MAX_GRID_DIMENSION};
pub use payload::{DailyResponse, GridResponse, SeriesRecord, SeriesResponse, SummaryResponse};
pub use series::{Pollutant, TimeSeries, TimeSeriesPoint};
