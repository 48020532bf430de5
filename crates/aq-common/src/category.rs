//! AQI severity bands.

use serde::{Deserialize, Serialize};

/// The six AQI bands, in increasing severity.
///
/// Each band includes its upper bound: 50 is `Good`, 50.5 and 51 are
/// `Moderate`. Values below zero fall into `Good` and anything above 300
/// is `Hazardous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBand {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiBand {
    /// All bands in severity order.
    pub const ALL: [AqiBand; 6] = [
        AqiBand::Good,
        AqiBand::Moderate,
        AqiBand::UnhealthyForSensitive,
        AqiBand::Unhealthy,
        AqiBand::VeryUnhealthy,
        AqiBand::Hazardous,
    ];

    /// Classify a finite index value.
    pub fn for_value(value: f64) -> Self {
        match value {
            v if v <= 50.0 => AqiBand::Good,
            v if v <= 100.0 => AqiBand::Moderate,
            v if v <= 150.0 => AqiBand::UnhealthyForSensitive,
            v if v <= 200.0 => AqiBand::Unhealthy,
            v if v <= 300.0 => AqiBand::VeryUnhealthy,
            _ => AqiBand::Hazardous,
        }
    }

    /// Classify an optional value; absent and non-finite values have no band.
    pub fn classify(value: Option<f64>) -> Option<Self> {
        value.filter(|v| v.is_finite()).map(Self::for_value)
    }

    /// Inclusive upper bound of the band, `None` for the open-ended top band.
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            AqiBand::Good => Some(50.0),
            AqiBand::Moderate => Some(100.0),
            AqiBand::UnhealthyForSensitive => Some(150.0),
            AqiBand::Unhealthy => Some(200.0),
            AqiBand::VeryUnhealthy => Some(300.0),
            AqiBand::Hazardous => None,
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Moderate => "Moderate",
            AqiBand::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            AqiBand::Unhealthy => "Unhealthy",
            AqiBand::VeryUnhealthy => "Very Unhealthy",
            AqiBand::Hazardous => "Hazardous",
        }
    }

    /// Position in severity order, 0 for `Good`.
    pub fn index(self) -> usize {
        self as usize
    }
}
