//! Short-horizon AQI outlook from recent readings.

use aq_common::{AqiBand, TimeSeries};
use serde::Serialize;

/// Records considered, counted from the end of the series.
const WINDOW: usize = 10;
const MIN_RECORDS: usize = 5;
const MIN_VALUES: usize = 3;
/// Steps extrapolated past the latest reading.
const HORIZON_STEPS: f64 = 3.0;
/// Average step change beyond which the trend is not stable.
const STABLE_BAND: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendOutlook {
    pub current: f64,
    pub predicted: f64,
    pub average_change: f64,
    pub direction: TrendDirection,
    pub predicted_band: AqiBand,
}

/// Linear outlook over the tail of an AQI series.
///
/// `None` when the tail is too short or too sparse to say anything.
pub fn outlook(series: &TimeSeries) -> Option<TrendOutlook> {
    let points = series.points();
    if points.len() < MIN_RECORDS {
        return None;
    }

    let tail = &points[points.len().saturating_sub(WINDOW)..];
    let values: Vec<f64> = tail
        .iter()
        .filter_map(|p| p.value.filter(|v| v.is_finite()))
        .collect();
    if values.len() < MIN_VALUES {
        return None;
    }

    let steps = values.len() - 1;
    let average_change = values.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / steps as f64;
    let current = *values.last()?;
    let predicted = (current + average_change * HORIZON_STEPS).max(0.0);

    let direction = if average_change > STABLE_BAND {
        TrendDirection::Increasing
    } else if average_change < -STABLE_BAND {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    Some(TrendOutlook {
        current,
        predicted,
        average_change,
        direction,
        predicted_band: AqiBand::for_value(predicted),
    })
}
