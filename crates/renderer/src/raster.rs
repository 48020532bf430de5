//! Grid to pixel-buffer rasterization.

use aq_common::{Grid, GridError};

use crate::color::{Color, ColorMapper};
use crate::png;

/// An RGBA pixel buffer, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, 4 per pixel, row-major from the top row.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at image coordinates (x right, y down).
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some(Color::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, png::PngError> {
        png::create_png_auto(&self.pixels, self.width, self.height)
    }
}

/// Rasterize a grid with the overlay mapper (absent cells transparent).
pub fn rasterize(grid: &Grid) -> RasterImage {
    rasterize_with(grid, &ColorMapper::overlay())
}

/// Rasterize a grid, one pixel per cell.
///
/// Grid row 0 is the southern-most row, so it lands on the bottom image
/// row: grid row `r` is written to image row `rows - 1 - r`.
pub fn rasterize_with(grid: &Grid, mapper: &ColorMapper) -> RasterImage {
    let width = grid.cols();
    let height = grid.rows();
    let mut pixels = vec![0u8; width * height * 4];

    for r in 0..height {
        let image_row = height - 1 - r;
        let row_start = image_row * width * 4;
        let out = &mut pixels[row_start..row_start + width * 4];

        for (cell, px) in grid.row(r).iter().zip(out.chunks_exact_mut(4)) {
            px.copy_from_slice(&mapper.color_for(*cell).to_rgba());
        }
    }

    RasterImage {
        width,
        height,
        pixels,
    }
}

/// Validate a raw nested payload and rasterize it.
///
/// Empty, ragged or oversized input fails before any pixel buffer is
/// allocated.
pub fn rasterize_rows(rows: &[Vec<Option<f64>>]) -> Result<RasterImage, GridError> {
    let grid = Grid::from_rows(rows)?;
    Ok(rasterize(&grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell() {
        let image = rasterize_rows(&[vec![Some(42.0)]]).unwrap();
        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), 1);
        assert_eq!(image.as_rgba().len(), 4);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let image = rasterize_rows(&[vec![Some(1.0), Some(2.0)]]).unwrap();
        assert!(image.pixel(2, 0).is_none());
        assert!(image.pixel(0, 1).is_none());
    }

    #[test]
    fn test_malformed_rejected() {
        assert_eq!(rasterize_rows(&[]).unwrap_err(), GridError::Empty);
    }
}
