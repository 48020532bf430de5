//! Time series of pollutant readings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::payload::SeriesRecord;

/// Series value keys carried by the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Aqi,
    Pm25,
    Pm10,
    No2,
    So2,
    Co,
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 7] = [
        Pollutant::Aqi,
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Field name in the series payload.
    pub fn key(self) -> &'static str {
        match self {
            Pollutant::Aqi => "aqi",
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
            Pollutant::O3 => "o3",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Pollutant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pollutant::ALL
            .iter()
            .copied()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown pollutant key: {}", s))
    }
}

/// One sample of a single-valued series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Samples ordered by timestamp ascending. Equal timestamps keep their
/// arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Build a series, ordering points by timestamp with a stable sort.
    pub fn new(mut points: Vec<TimeSeriesPoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Project one pollutant out of the multi-valued payload records.
    pub fn from_records(records: &[SeriesRecord], pollutant: Pollutant) -> Self {
        Self::new(
            records
                .iter()
                .map(|r| TimeSeriesPoint {
                    timestamp: r.timestamp,
                    value: r.value(pollutant),
                })
                .collect(),
        )
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Number of records, absent values included.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Records with a finite value, paired with their index in the series.
    pub fn present(&self) -> impl Iterator<Item = (usize, DateTime<Utc>, f64)> + '_ {
        self.points.iter().enumerate().filter_map(|(i, p)| {
            p.value
                .filter(|v| v.is_finite())
                .map(|v| (i, p.timestamp, v))
        })
    }
}

/// Parse an ISO 8601 timestamp.
///
/// Accepts RFC 3339 with offset, naive date-times (taken as UTC, with or
/// without fractional seconds) and plain dates.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimestampError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(TimestampError::InvalidFormat(s.to_string()))
}

/// Serde adapter for lenient ISO 8601 timestamps.
pub mod iso8601 {
    use super::parse_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-01-15T12:00:00Z").unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let dt = parse_timestamp("2024-01-15T06:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 6, 30, 0).unwrap());

        let frac = parse_timestamp("2024-01-15T06:30:00.250000").unwrap();
        assert_eq!(frac.minute(), 30);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_pollutant_from_str() {
        assert_eq!("PM25".parse::<Pollutant>().unwrap(), Pollutant::Pm25);
        assert!("pm1".parse::<Pollutant>().is_err());
    }

    #[test]
    fn test_stable_order_for_duplicates() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let series = TimeSeries::new(vec![
            TimeSeriesPoint { timestamp: t1, value: Some(3.0) },
            TimeSeriesPoint { timestamp: t0, value: Some(1.0) },
            TimeSeriesPoint { timestamp: t0, value: Some(2.0) },
        ]);
        let values: Vec<_> = series.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }
}
