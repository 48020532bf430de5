//! Test data generators for grids and time series.
//!
//! These generators create predictable, verifiable patterns in the shapes
//! the data service returns (nested row lists, JSON payloads).

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

/// Creates a grid whose value encodes its position: `row * 1000 + col`.
///
/// Handy for checking that row ordering survives a transformation.
///
/// ```
/// use test_utils::create_indexed_grid;
///
/// let grid = create_indexed_grid(3, 2);
/// assert_eq!(grid.len(), 3);
/// assert_eq!(grid[2][1], Some(2001.0));
/// ```
pub fn create_indexed_grid(rows: usize, cols: usize) -> Vec<Vec<Option<f64>>> {
    (0..rows)
        .map(|r| (0..cols).map(|c| Some((r * 1000 + c) as f64)).collect())
        .collect()
}

/// Creates an AQI grid rising linearly from 0 on the southern row to 500
/// on the northern row, so every band appears on a tall enough grid.
pub fn create_aqi_gradient_grid(rows: usize, cols: usize) -> Vec<Vec<Option<f64>>> {
    let denom = rows.saturating_sub(1).max(1) as f64;
    (0..rows)
        .map(|r| {
            let aqi = 500.0 * r as f64 / denom;
            vec![Some(aqi); cols]
        })
        .collect()
}

/// Creates a uniform grid with every `gap_every`-th cell (row-major) absent.
pub fn create_sparse_grid(
    rows: usize,
    cols: usize,
    value: f64,
    gap_every: usize,
) -> Vec<Vec<Option<f64>>> {
    let gap_every = gap_every.max(1);
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    if (r * cols + c) % gap_every == 0 {
                        None
                    } else {
                        Some(value)
                    }
                })
                .collect()
        })
        .collect()
}

/// Fixed origin for generated series.
pub fn series_origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default()
}

/// `n` hourly timestamps starting at [`series_origin`].
pub fn hourly_timestamps(n: usize) -> Vec<DateTime<Utc>> {
    (0..n)
        .map(|i| series_origin() + Duration::hours(i as i64))
        .collect()
}

/// Smooth AQI-like values oscillating between 40 and 160.
pub fn wave_values(n: usize) -> Vec<Option<f64>> {
    (0..n)
        .map(|i| Some(100.0 + 60.0 * (i as f64 / 12.0).sin()))
        .collect()
}

/// Builds a history time-series JSON payload with hourly records carrying
/// `values` under the `aqi` key and a derived `pm25` value.
pub fn series_payload_json(values: &[Option<f64>], source: &str) -> String {
    let series: Vec<_> = hourly_timestamps(values.len())
        .into_iter()
        .zip(values)
        .map(|(ts, v)| {
            json!({
                "timestamp": ts.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "aqi": v,
                "pm25": v.map(|x| x * 0.4),
            })
        })
        .collect();

    json!({ "series": series, "source": source }).to_string()
}

/// Builds a heatmap JSON payload around a nested grid.
pub fn grid_payload_json(grid: &[Vec<Option<f64>>], note: Option<&str>) -> String {
    let mut body = json!({ "grid_aqi": grid });
    if let Some(note) = note {
        body["note"] = json!(note);
    }
    body.to_string()
}
