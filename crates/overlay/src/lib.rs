//! Viewport-driven air-quality overlay.
//!
//! Fetches heatmap grids for the visible map area, rasterizes them and
//! hands the result to a map display, debouncing viewport events and
//! discarding stale responses. Also hosts the history client used by the
//! chart.

pub mod client;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod display;
pub mod metrics;
pub mod token;

pub use client::{GridRequest, GridSource, HistoryBundle, HttpDataService, SeriesSource};
pub use config::{ConfigError, HistoryQuery, OverlayConfig};
pub use controller::{Advisory, OverlayState, ViewportEvent, ViewportOverlayController};
pub use debounce::Debouncer;
pub use display::{MapDisplay, OverlayLayer};
pub use metrics::{MetricsSnapshot, OverlayMetrics};
pub use token::{FetchToken, TokenSource};
