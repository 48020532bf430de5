//! Image rendering for air-quality grids.
//!
//! - `color`: AQI value to band color (step function)
//! - `raster`: grid to RGBA buffer with the north-up row flip
//! - `png`: PNG encoding of the resulting buffers

pub mod color;
pub mod png;
pub mod raster;

pub use color::{band_color, color_for, AbsentMode, Color, ColorMapper, NO_DATA_COLOR};
pub use raster::{rasterize, rasterize_rows, rasterize_with, RasterImage};
