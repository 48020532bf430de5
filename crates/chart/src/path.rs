//! Polyline, area, marker and label geometry.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{ChartConfig, GapPolicy};
use crate::scale::NormalizedPoint;

/// Canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<&NormalizedPoint> for Point {
    fn from(p: &NormalizedPoint) -> Self {
        Point { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// Rank among plotted points.
    pub index: usize,
    pub point: Point,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeLabel {
    /// Rank among plotted points.
    pub index: usize,
    pub x: f64,
    pub timestamp: DateTime<Utc>,
    /// Short date text, e.g. `Jan 5`.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathGeometry {
    /// Connected runs of points. A single run under [`GapPolicy::Connect`].
    pub segments: Vec<Vec<Point>>,
    /// Bottom edge the area fill closes against.
    pub baseline: f64,
    pub markers: Vec<Marker>,
    pub labels: Vec<TimeLabel>,
}

impl PathGeometry {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// SVG path data for the polyline, one `M` per segment.
    pub fn line_path_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            for (i, p) in segment.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                push_command(&mut d, cmd, p.x, p.y);
            }
        }
        d
    }

    /// SVG path data for the area fill: each segment dropped to the
    /// baseline at both ends and closed.
    pub fn area_path_data(&self) -> String {
        let mut d = String::new();
        for segment in &self.segments {
            let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
                continue;
            };
            push_command(&mut d, 'M', first.x, self.baseline);
            for p in segment {
                push_command(&mut d, 'L', p.x, p.y);
            }
            push_command(&mut d, 'L', last.x, self.baseline);
            d.push_str(" Z");
        }
        d
    }
}

fn push_command(d: &mut String, cmd: char, x: f64, y: f64) {
    if !d.is_empty() {
        d.push(' ');
    }
    let _ = write!(d, "{cmd}{x:.2},{y:.2}");
}

/// Indices to keep when thinning `n` ordered items down to at most `cap`.
///
/// Every `k`th index is kept with `k = ceil((n - 1) / (cap - 1))`, plus the
/// last index unconditionally, so the first and last always survive and
/// the result never exceeds `cap`.
pub fn decimate_indices(n: usize, cap: usize) -> Vec<usize> {
    if n == 0 || cap == 0 {
        return Vec::new();
    }
    if n <= cap {
        return (0..n).collect();
    }
    if cap == 1 {
        return vec![n - 1];
    }

    let last = n - 1;
    let stride = last.div_ceil(cap - 1);
    let mut indices: Vec<usize> = (0..last).step_by(stride).collect();
    indices.push(last);
    indices
}

/// Build the drawable geometry from scaled points.
///
/// Points must be in timestamp order, as produced by
/// [`compute_scale`](crate::compute_scale).
pub fn build_path(points: &[NormalizedPoint], baseline: f64, config: &ChartConfig) -> PathGeometry {
    let segments = split_segments(points, config.gap_policy);

    let markers = decimate_indices(points.len(), config.marker_cap)
        .into_iter()
        .map(|i| Marker {
            index: i,
            point: Point::from(&points[i]),
            value: points[i].value,
        })
        .collect();

    let labels = decimate_indices(points.len(), config.label_cap)
        .into_iter()
        .map(|i| TimeLabel {
            index: i,
            x: points[i].x,
            timestamp: points[i].timestamp,
            text: points[i].timestamp.format("%b %-d").to_string(),
        })
        .collect();

    PathGeometry {
        segments,
        baseline,
        markers,
        labels,
    }
}

fn split_segments(points: &[NormalizedPoint], policy: GapPolicy) -> Vec<Vec<Point>> {
    let mut segments: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for (i, p) in points.iter().enumerate() {
        if i > 0 && breaks_between(&points[i - 1], p, policy) {
            segments.push(std::mem::take(&mut current));
        }
        current.push(Point::from(p));
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn breaks_between(prev: &NormalizedPoint, next: &NormalizedPoint, policy: GapPolicy) -> bool {
    match policy {
        GapPolicy::Connect => false,
        GapPolicy::BreakOnMissing => next.source_index > prev.source_index + 1,
        GapPolicy::BreakAfter { seconds } => {
            (next.timestamp - prev.timestamp).num_seconds() > seconds
        }
    }
}
