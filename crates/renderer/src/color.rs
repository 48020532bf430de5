//! AQI color mapping.
//!
//! The mapping is a step function over [`AqiBand`]: every value in a band
//! gets the band's color, with no blending across band edges.

use aq_common::AqiBand;
use serde::{Deserialize, Serialize};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Color of the "no data" cell in [`AbsentMode::NoData`].
pub const NO_DATA_COLOR: Color = Color::opaque(0xC8, 0xC8, 0xC8);

/// Band colors, in severity order.
const BAND_COLORS: [Color; 6] = [
    Color::opaque(0x00, 0xE4, 0x00), // green
    Color::opaque(0xFF, 0xFF, 0x00), // yellow
    Color::opaque(0xFF, 0x7E, 0x00), // orange
    Color::opaque(0xFF, 0x00, 0x00), // red
    Color::opaque(0x8F, 0x3F, 0x97), // purple
    Color::opaque(0x7E, 0x00, 0x18), // maroon
];

/// Fixed color of an AQI band.
pub fn band_color(band: AqiBand) -> Color {
    BAND_COLORS[band.index()]
}

/// How absent values are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentMode {
    /// Fully transparent; the base map shows through. Overlay default.
    #[default]
    Transparent,
    /// An opaque neutral gray, for calendar-style cells.
    NoData,
}

impl AbsentMode {
    pub fn color(self) -> Color {
        match self {
            AbsentMode::Transparent => Color::transparent(),
            AbsentMode::NoData => NO_DATA_COLOR,
        }
    }
}

/// Map an index value to its display color.
///
/// Absent and non-finite values take the color selected by `absent`.
pub fn color_for(value: Option<f64>, absent: AbsentMode) -> Color {
    match AqiBand::classify(value) {
        Some(band) => band_color(band),
        None => absent.color(),
    }
}

/// A [`color_for`] bound to one absent-value mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorMapper {
    absent: AbsentMode,
}

impl ColorMapper {
    pub fn new(absent: AbsentMode) -> Self {
        Self { absent }
    }

    /// Mapper used for map overlays: absent cells are transparent.
    pub fn overlay() -> Self {
        Self::new(AbsentMode::Transparent)
    }

    /// Mapper used for calendar cells: absent cells are gray.
    pub fn calendar() -> Self {
        Self::new(AbsentMode::NoData)
    }

    pub fn absent_mode(&self) -> AbsentMode {
        self.absent
    }

    #[inline]
    pub fn color_for(&self, value: Option<f64>) -> Color {
        color_for(value, self.absent)
    }

    /// Legend entries: one (band, color) pair per band in severity order.
    pub fn legend(&self) -> Vec<(AqiBand, Color)> {
        AqiBand::ALL.iter().map(|&b| (b, band_color(b))).collect()
    }
}
