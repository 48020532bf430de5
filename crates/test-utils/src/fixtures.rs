//! Common test fixtures mirroring data service responses.

/// Viewport corners as (lat1, lon1, lat2, lon2).
pub mod viewport {
    /// Delhi NCR at city zoom
    pub const DELHI: (f64, f64, f64, f64) = (28.40, 76.84, 28.88, 77.35);

    /// Mumbai at city zoom
    pub const MUMBAI: (f64, f64, f64, f64) = (18.89, 72.77, 19.27, 72.99);

    /// Most of the Indian subcontinent
    pub const INDIA: (f64, f64, f64, f64) = (6.5, 68.0, 35.5, 97.5);

    /// Delhi with corners supplied north-east first
    pub const DELHI_SWAPPED: (f64, f64, f64, f64) = (28.88, 77.35, 28.40, 76.84);
}

/// Heatmap endpoint payloads.
pub mod grid_json {
    /// 2x2 grid touching four bands; row 0 is the southern row.
    pub const FOUR_BANDS: &str = r#"{"grid_aqi": [[10, 60], [160, 400]]}"#;

    /// Fallback grid the service returns when too few stations answered.
    pub const FALLBACK_WITH_NOTE: &str =
        r#"{"grid_aqi": [[50.0, 50.0], [50.0, 50.0]], "note": "fallback - insufficient samples"}"#;

    /// Service-reported failure with an advisory note.
    pub const SERVICE_ERROR: &str =
        r#"{"error": "OpenWeather quota exceeded", "note": "try again in a minute"}"#;

    /// Rows of unequal length.
    pub const RAGGED: &str = r#"{"grid_aqi": [[10, 20, 30], [40, 50]]}"#;

    /// Grid with absent cells.
    pub const WITH_GAPS: &str = r#"{"grid_aqi": [[null, 75], [120, null]]}"#;

    /// Empty grid.
    pub const EMPTY: &str = r#"{"grid_aqi": []}"#;
}

/// History endpoint payloads.
pub mod history_json {
    pub const DAILY: &str = r#"{"daily": [{"date": "2024-01-01", "aqi_mean": 88.2, "aqi_max": 140.0}], "source": "india_aqi"}"#;

    pub const SUMMARY: &str = r#"{"summary": {"stats": {"aqi": {"mean": 92.4, "max": 181.0}}}, "source": "india_aqi"}"#;

    pub const SUMMARY_EMPTY: &str = r#"{"summary": null, "source": "none"}"#;
}
