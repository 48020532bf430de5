//! End-to-end tests from a service payload to a chart frame.

use aq_common::{Pollutant, SeriesResponse, TimeSeries};
use chart::{build_frame, outlook, ChartConfig, ChartOutcome, GapPolicy, TrendDirection};
use test_utils::{series_payload_json, wave_values};

fn parse(json: &str) -> SeriesResponse {
    serde_json::from_str(json).expect("valid series payload")
}

#[test]
fn test_frame_from_payload() {
    let response = parse(&series_payload_json(&wave_values(48), "cpcb"));
    let series = TimeSeries::from_records(&response.series, Pollutant::Aqi);
    let outcome = build_frame(&series, Pollutant::Aqi, &ChartConfig::default());

    let frame = outcome.frame().expect("chart expected");
    assert_eq!(frame.stats.total_records, 48);
    assert_eq!(frame.stats.present, 48);
    assert_eq!(frame.stats.span_days, 2);
    assert_eq!(frame.ticks.len(), 5);
    assert!(frame.path.markers.len() <= 30);
    assert!(frame.path.labels.len() <= 8);
    assert!(frame.value_range.min >= 40.0 && frame.value_range.max <= 160.0);
}

#[test]
fn test_pollutant_selects_values() {
    let response = parse(&series_payload_json(&[Some(100.0), Some(50.0)], "cpcb"));
    let series = TimeSeries::from_records(&response.series, Pollutant::Pm25);
    let outcome = build_frame(&series, Pollutant::Pm25, &ChartConfig::default());
    let frame = outcome.frame().unwrap();
    assert_eq!(frame.value_range.max, 40.0);
    assert_eq!(frame.value_range.min, 20.0);
}

#[test]
fn test_missing_pollutant_is_no_data() {
    let response = parse(&series_payload_json(&[Some(100.0), Some(50.0)], "cpcb"));
    let series = TimeSeries::from_records(&response.series, Pollutant::O3);
    let outcome = build_frame(&series, Pollutant::O3, &ChartConfig::default());
    assert_eq!(
        outcome,
        ChartOutcome::NoData {
            pollutant: Pollutant::O3,
            total_records: 2
        }
    );
}

#[test]
fn test_frame_serializes_for_drawing_surface() {
    let response = parse(&series_payload_json(&[Some(30.0), None, Some(60.0)], "cpcb"));
    let series = TimeSeries::from_records(&response.series, Pollutant::Aqi);
    let outcome = build_frame(&series, Pollutant::Aqi, &ChartConfig::default());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["state"], "chart");
    assert_eq!(json["pollutant"], "aqi");
    assert_eq!(json["ticks"].as_array().unwrap().len(), 5);
    assert_eq!(json["path"]["markers"].as_array().unwrap().len(), 2);
}

#[test]
fn test_config_from_yaml_partial() {
    let yaml = r#"
marker_cap: 12
canvas:
  width: 640
gap_policy:
  mode: break_after
  seconds: 7200
"#;
    let config: ChartConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.marker_cap, 12);
    assert_eq!(config.label_cap, 8);
    assert_eq!(config.canvas.width, 640.0);
    assert_eq!(config.canvas.height, 300.0);
    assert_eq!(config.gap_policy, GapPolicy::BreakAfter { seconds: 7200 });
    assert!(config.validate().is_ok());
}

#[test]
fn test_outlook_from_payload() {
    let values: Vec<Option<f64>> = (0..12).map(|i| Some(50.0 + 5.0 * i as f64)).collect();
    let response = parse(&series_payload_json(&values, "cpcb"));
    let series = TimeSeries::from_records(&response.series, Pollutant::Aqi);

    let out = outlook(&series).unwrap();
    assert_eq!(out.current, 105.0);
    assert_eq!(out.average_change, 5.0);
    assert_eq!(out.predicted, 120.0);
    assert_eq!(out.direction, TrendDirection::Increasing);
}
