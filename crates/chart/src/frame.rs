//! Everything a drawing surface needs for one chart.

use aq_common::{Pollutant, TimeSeries};
use serde::Serialize;
use tracing::debug;

use crate::config::{ChartConfig, PlotArea};
use crate::path::{build_path, PathGeometry};
use crate::scale::{compute_scale, AxisTick, Scale, ScaleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub range: f64,
}

impl From<&Scale> for ValueRange {
    fn from(scale: &Scale) -> Self {
        Self {
            min: scale.min,
            max: scale.max,
            mean: scale.mean,
            range: scale.range,
        }
    }
}

/// Caption figures for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStats {
    pub total_records: usize,
    pub present: usize,
    /// Whole days covered by present samples, rounded up.
    pub span_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub pollutant: Pollutant,
    pub path: PathGeometry,
    pub ticks: Vec<AxisTick>,
    pub value_range: ValueRange,
    pub stats: SeriesStats,
    pub area: PlotArea,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartOutcome {
    NoData {
        pollutant: Pollutant,
        total_records: usize,
    },
    Chart(ChartFrame),
}

impl ChartOutcome {
    pub fn frame(&self) -> Option<&ChartFrame> {
        match self {
            ChartOutcome::Chart(frame) => Some(frame),
            ChartOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartOutcome::NoData { .. })
    }
}

/// Scale a series and build its path in one step.
pub fn build_frame(
    series: &TimeSeries,
    pollutant: Pollutant,
    config: &ChartConfig,
) -> ChartOutcome {
    let scale = match compute_scale(series, config) {
        ScaleOutcome::NoData { total_records } => {
            debug!(pollutant = %pollutant, total_records, "No present values to chart");
            return ChartOutcome::NoData {
                pollutant,
                total_records,
            };
        }
        ScaleOutcome::Scaled(scale) => scale,
    };

    let path = build_path(&scale.points, scale.area.bottom(), config);
    let stats = SeriesStats {
        total_records: scale.total_records,
        present: scale.points.len(),
        span_days: span_days(&scale),
    };

    debug!(
        pollutant = %pollutant,
        points = stats.present,
        segments = path.segments.len(),
        markers = path.markers.len(),
        "Built chart frame"
    );

    ChartOutcome::Chart(ChartFrame {
        pollutant,
        value_range: ValueRange::from(&scale),
        ticks: scale.ticks,
        area: scale.area,
        path,
        stats,
    })
}

fn span_days(scale: &Scale) -> i64 {
    match (scale.points.first(), scale.points.last()) {
        (Some(first), Some(last)) => {
            let seconds = (last.timestamp - first.timestamp).num_seconds().max(0);
            (seconds + 86_399) / 86_400
        }
        _ => 0,
    }
}
