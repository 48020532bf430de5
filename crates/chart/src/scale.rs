//! Value-domain bounds, axis ticks and the point transform.

use aq_common::TimeSeries;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{ChartConfig, PlotArea};

/// A present sample placed in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    /// Index of the sample in the source series, absent samples included.
    pub source_index: usize,
}

/// A y-axis tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    /// Canvas y coordinate of the tick.
    pub position: f64,
    /// Position within the value domain, 0 at the bottom and 1 at the top.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// `max - min`, or 1 for a flat series. Saturates at `f64::MAX` when
    /// the bounds are too far apart to subtract.
    pub range: f64,
    pub ticks: Vec<AxisTick>,
    pub points: Vec<NormalizedPoint>,
    pub area: PlotArea,
    /// Records in the input series, absent values included.
    pub total_records: usize,
}

impl Scale {
    /// Canvas y coordinate of a value; larger values sit higher.
    pub fn project(&self, value: f64) -> f64 {
        let fraction = domain_fraction(value, self.min, self.max, self.range);
        self.area.top + self.area.height - fraction * self.area.height
    }

    pub fn is_flat(&self) -> bool {
        self.min == self.max
    }
}

/// Result of [`compute_scale`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScaleOutcome {
    /// No record carried a value. Render an empty state, not a chart.
    NoData { total_records: usize },
    Scaled(Scale),
}

impl ScaleOutcome {
    pub fn scale(&self) -> Option<&Scale> {
        match self {
            ScaleOutcome::Scaled(scale) => Some(scale),
            ScaleOutcome::NoData { .. } => None,
        }
    }

    pub fn into_scale(self) -> Option<Scale> {
        match self {
            ScaleOutcome::Scaled(scale) => Some(scale),
            ScaleOutcome::NoData { .. } => None,
        }
    }
}

/// Scale a series into the configured plot area.
///
/// Horizontal position is the rank among present samples, so spacing is
/// even regardless of timestamps. A flat series gets `range = 1` and plots
/// along the bottom edge.
pub fn compute_scale(series: &TimeSeries, config: &ChartConfig) -> ScaleOutcome {
    let present: Vec<(usize, DateTime<Utc>, f64)> = series.present().collect();
    let total_records = series.len();

    if present.is_empty() {
        return ScaleOutcome::NoData { total_records };
    }

    let (min, max, sum) = present.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(lo, hi, sum), &(_, _, v)| (lo.min(v), hi.max(v), sum + v),
    );
    let count = present.len();
    let mean = if sum.is_finite() {
        sum / count as f64
    } else {
        present.iter().map(|&(_, _, v)| v / count as f64).sum()
    };
    let range = if max > min { (max - min).min(f64::MAX) } else { 1.0 };
    let area = config.plot_area();

    let x_denom = if count > 1 { (count - 1) as f64 } else { 1.0 };
    let points = present
        .iter()
        .enumerate()
        .map(|(rank, &(source_index, timestamp, value))| NormalizedPoint {
            x: area.left + (rank as f64 / x_denom) * area.width,
            y: area.top + area.height - domain_fraction(value, min, max, range) * area.height,
            value,
            timestamp,
            source_index,
        })
        .collect();

    let tick_count = config.tick_count.max(2);
    let ticks = (0..tick_count)
        .map(|i| {
            let fraction = i as f64 / (tick_count - 1) as f64;
            AxisTick {
                value: domain_value(fraction, min, max, range),
                position: area.top + area.height - fraction * area.height,
                fraction,
            }
        })
        .collect();

    ScaleOutcome::Scaled(Scale {
        min,
        max,
        mean,
        range,
        ticks,
        points,
        area,
        total_records,
    })
}

/// Position of `value` within `[min, max]`, 0 at `min` and 1 at `max`.
fn domain_fraction(value: f64, min: f64, max: f64, range: f64) -> f64 {
    if (max - min).is_finite() {
        (value - min) / range
    } else {
        // Halved operands keep the span finite near the f64 limits
        (value / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
    }
}

/// Inverse of [`domain_fraction`].
fn domain_value(fraction: f64, min: f64, max: f64, range: f64) -> f64 {
    if (max - min).is_finite() {
        min + range * fraction
    } else {
        min * (1.0 - fraction) + max * fraction
    }
}
