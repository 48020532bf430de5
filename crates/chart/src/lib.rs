//! Chart geometry for pollutant time series.
//!
//! Turns a sparse, irregular series into plot coordinates, axis ticks and
//! decimated marker/label sets that a drawing surface can render without
//! knowing the data's scale.

pub mod config;
pub mod frame;
pub mod path;
pub mod scale;
pub mod trend;

pub use config::{Canvas, ChartConfig, ChartConfigError, GapPolicy, Padding, PlotArea};
pub use frame::{build_frame, ChartFrame, ChartOutcome, SeriesStats, ValueRange};
pub use path::{build_path, decimate_indices, Marker, PathGeometry, Point, TimeLabel};
pub use scale::{compute_scale, AxisTick, NormalizedPoint, Scale, ScaleOutcome};
pub use trend::{outlook, TrendDirection, TrendOutlook};
