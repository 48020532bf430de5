//! Geographic rectangles: the viewport handed over by the map and the
//! normalized rectangle a raster is stretched across.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Create a coordinate, rejecting values outside the WGS84 ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::LatitudeOutOfRange(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }
}

/// The visible map rectangle as reported by the map component.
///
/// The corners are stored as supplied. Nothing guarantees that `south_west`
/// is actually south-west of `north_east`; use [`anchor_for`] to obtain an
/// ordered rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub south_west: LatLon,
    pub north_east: LatLon,
}

impl ViewportRect {
    pub fn new(south_west: LatLon, north_east: LatLon) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Build a viewport from raw corner values, validating both corners.
    pub fn from_corners(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<Self, GeoError> {
        Ok(Self {
            south_west: LatLon::new(lat1, lon1)?,
            north_east: LatLon::new(lat2, lon2)?,
        })
    }

    /// Parse a corner string: "lat1,lon1,lat2,lon2"
    pub fn parse(s: &str) -> Result<Self, GeoError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(GeoError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| GeoError::InvalidNumber(part.to_string()))?;
        }

        Self::from_corners(values[0], values[1], values[2], values[3])
    }
}

/// An ordered geographic rectangle: `south_west` holds the smaller latitude
/// and longitude, `north_east` the larger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRect {
    pub south_west: LatLon,
    pub north_east: LatLon,
}

impl GeoRect {
    /// Height of the rectangle in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    /// Width of the rectangle in degrees of longitude.
    pub fn lon_span(&self) -> f64 {
        self.north_east.lon - self.south_west.lon
    }

    /// Check if a point lies inside the rectangle (edges included).
    pub fn contains(&self, point: LatLon) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lon >= self.south_west.lon
            && point.lon <= self.north_east.lon
    }

    /// Leaflet-style bounds: `[[south, west], [north, east]]`.
    pub fn to_bounds_array(&self) -> [[f64; 2]; 2] {
        [
            [self.south_west.lat, self.south_west.lon],
            [self.north_east.lat, self.north_east.lon],
        ]
    }
}

/// Compute the rectangle a rasterized grid must be stretched to cover.
///
/// Corners are reordered component-wise, so a viewport supplied as
/// (NE, SW) or (NW, SE) anchors identically to its (SW, NE) form.
pub fn anchor_for(viewport: &ViewportRect) -> GeoRect {
    let a = viewport.south_west;
    let b = viewport.north_east;

    GeoRect {
        south_west: LatLon {
            lat: a.lat.min(b.lat),
            lon: a.lon.min(b.lon),
        },
        north_east: LatLon {
            lat: a.lat.max(b.lat),
            lon: a.lon.max(b.lon),
        },
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("Latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),

    #[error("Invalid viewport format: {0}. Expected 'lat1,lon1,lat2,lon2'")]
    InvalidFormat(String),

    #[error("Invalid number in viewport: {0}")]
    InvalidNumber(String),
}
