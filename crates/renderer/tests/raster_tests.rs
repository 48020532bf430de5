//! Tests for grid rasterization.

use aq_common::{Grid, GridError, MAX_GRID_DIMENSION};
use renderer::color::{Color, ColorMapper, NO_DATA_COLOR};
use renderer::raster::{rasterize, rasterize_rows, rasterize_with};
use test_utils::{create_aqi_gradient_grid, create_indexed_grid, create_sparse_grid, grid_json};

const GREEN: Color = Color::opaque(0x00, 0xE4, 0x00);
const YELLOW: Color = Color::opaque(0xFF, 0xFF, 0x00);
const RED: Color = Color::opaque(0xFF, 0x00, 0x00);
const MAROON: Color = Color::opaque(0x7E, 0x00, 0x18);

fn grid_from_json(json: &str) -> Grid {
    let response: aq_common::GridResponse = serde_json::from_str(json).unwrap();
    response.grid().unwrap()
}

// ============================================================================
// Dimension tests
// ============================================================================

#[test]
fn test_dimensions_match_grid() {
    for (rows, cols) in [(1, 1), (1, 7), (7, 1), (80, 80), (13, 41)] {
        let grid = Grid::from_rows(&create_indexed_grid(rows, cols)).unwrap();
        let image = rasterize(&grid);
        assert_eq!(image.height(), rows);
        assert_eq!(image.width(), cols);
        assert_eq!(image.as_rgba().len(), rows * cols * 4);
    }
}

// ============================================================================
// Vertical flip tests
// ============================================================================

#[test]
fn test_four_band_example_is_flipped() {
    // grid row 0 = [10, 60] (south), row 1 = [160, 400] (north)
    let image = rasterize(&grid_from_json(grid_json::FOUR_BANDS));

    // bottom image row holds grid row 0
    assert_eq!(image.pixel(0, 1), Some(GREEN));
    assert_eq!(image.pixel(1, 1), Some(YELLOW));
    // top image row holds grid row 1
    assert_eq!(image.pixel(0, 0), Some(RED));
    assert_eq!(image.pixel(1, 0), Some(MAROON));
}

#[test]
fn test_top_row_is_last_grid_row() {
    let rows = create_aqi_gradient_grid(11, 3);
    let grid = Grid::from_rows(&rows).unwrap();
    let image = rasterize(&grid);
    let mapper = ColorMapper::overlay();

    for r in 0..grid.rows() {
        let image_row = grid.rows() - 1 - r;
        for c in 0..grid.cols() {
            assert_eq!(image.pixel(c, image_row), Some(mapper.color_for(grid.value(r, c))));
        }
    }
    // southern row is 0 AQI (green), northern row 500 (maroon)
    assert_eq!(image.pixel(0, 10), Some(GREEN));
    assert_eq!(image.pixel(0, 0), Some(MAROON));
}

#[test]
fn test_columns_not_mirrored() {
    let grid = Grid::from_rows(&[vec![Some(10.0), Some(400.0)]]).unwrap();
    let image = rasterize(&grid);
    assert_eq!(image.pixel(0, 0), Some(GREEN));
    assert_eq!(image.pixel(1, 0), Some(MAROON));
}

// ============================================================================
// Absent cell tests
// ============================================================================

#[test]
fn test_absent_cells_transparent() {
    let image = rasterize(&grid_from_json(grid_json::WITH_GAPS));
    // grid (0,0) is null -> bottom-left
    assert_eq!(image.pixel(0, 1), Some(Color::transparent()));
    // grid (1,1) is null -> top-right
    assert_eq!(image.pixel(1, 0), Some(Color::transparent()));
    assert_eq!(image.pixel(1, 1), Some(YELLOW));
}

#[test]
fn test_absent_cells_with_calendar_mapper() {
    let grid = Grid::from_rows(&create_sparse_grid(3, 3, 20.0, 3)).unwrap();
    let image = rasterize_with(&grid, &ColorMapper::calendar());
    // cell (0,0) is absent -> bottom-left
    assert_eq!(image.pixel(0, 2), Some(NO_DATA_COLOR));
    assert_eq!(image.pixel(1, 2), Some(GREEN));
}

// ============================================================================
// Malformed input tests
// ============================================================================

#[test]
fn test_rasterize_rows_rejects_ragged() {
    let rows = vec![vec![Some(1.0), Some(2.0)], vec![Some(1.0), Some(2.0), Some(3.0)]];
    assert_eq!(
        rasterize_rows(&rows).unwrap_err(),
        GridError::RaggedRow {
            row: 1,
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn test_rasterize_rows_rejects_oversized() {
    let rows = vec![vec![Some(1.0)]; MAX_GRID_DIMENSION + 1];
    assert!(matches!(rasterize_rows(&rows), Err(GridError::TooLarge { .. })));
}

#[test]
fn test_rasterize_rows_rejects_empty() {
    assert_eq!(rasterize_rows(&[]).unwrap_err(), GridError::Empty);
}
