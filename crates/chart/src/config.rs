//! Chart layout and decimation settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Space reserved around the plot for axes and labels, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 50.0,
            right: 20.0,
            top: 20.0,
            bottom: 50.0,
        }
    }
}

/// The full drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            padding: Padding::default(),
        }
    }
}

impl Canvas {
    /// The rectangle data points are plotted into.
    pub fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: self.padding.left,
            top: self.padding.top,
            width: self.width - self.padding.left - self.padding.right,
            height: self.height - self.padding.top - self.padding.bottom,
        }
    }
}

/// Plot rectangle in canvas pixels; y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Baseline of the area fill.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// What to do when consecutive plotted points straddle missing data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GapPolicy {
    /// Draw one line through every present point.
    #[default]
    Connect,
    /// Start a new segment wherever absent samples sat between two present
    /// ones.
    BreakOnMissing,
    /// Start a new segment when consecutive present samples are more than
    /// `seconds` apart.
    BreakAfter { seconds: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Number of y-axis ticks, both ends included.
    pub tick_count: usize,
    /// Upper bound on point markers.
    pub marker_cap: usize,
    /// Upper bound on x-axis time labels.
    pub label_cap: usize,
    pub canvas: Canvas,
    pub gap_policy: GapPolicy,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            tick_count: 5,
            marker_cap: 30,
            label_cap: 8,
            canvas: Canvas::default(),
            gap_policy: GapPolicy::Connect,
        }
    }
}

impl ChartConfig {
    pub fn plot_area(&self) -> PlotArea {
        self.canvas.plot_area()
    }

    pub fn validate(&self) -> Result<(), ChartConfigError> {
        if self.tick_count < 2 {
            return Err(ChartConfigError::TooFew("tick_count", self.tick_count));
        }
        if self.marker_cap < 2 {
            return Err(ChartConfigError::TooFew("marker_cap", self.marker_cap));
        }
        if self.label_cap < 2 {
            return Err(ChartConfigError::TooFew("label_cap", self.label_cap));
        }
        let area = self.plot_area();
        if !(area.width > 0.0 && area.height > 0.0) {
            return Err(ChartConfigError::EmptyPlotArea {
                width: area.width,
                height: area.height,
            });
        }
        if let GapPolicy::BreakAfter { seconds } = self.gap_policy {
            if seconds <= 0 {
                return Err(ChartConfigError::GapThreshold(seconds));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartConfigError {
    #[error("{0} must be at least 2, got {1}")]
    TooFew(&'static str, usize),

    #[error("Padding leaves no room to plot ({width}x{height})")]
    EmptyPlotArea { width: f64, height: f64 },

    #[error("Gap threshold must be positive, got {0}s")]
    GapThreshold(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plot_area() {
        let area = ChartConfig::default().plot_area();
        assert_eq!(area.left, 50.0);
        assert_eq!(area.top, 20.0);
        assert_eq!(area.width, 730.0);
        assert_eq!(area.height, 230.0);
        assert_eq!(area.bottom(), 250.0);
        assert_eq!(area.right(), 780.0);
    }

    #[test]
    fn test_validate_rejects_small_caps() {
        let config = ChartConfig {
            marker_cap: 1,
            ..ChartConfig::default()
        };
        assert_eq!(config.validate(), Err(ChartConfigError::TooFew("marker_cap", 1)));
    }

    #[test]
    fn test_validate_rejects_oversized_padding() {
        let mut config = ChartConfig::default();
        config.canvas.padding.left = 900.0;
        assert!(matches!(config.validate(), Err(ChartConfigError::EmptyPlotArea { .. })));
    }
}
