//! Rectangular grids of per-cell AQI values.

use serde::{Deserialize, Serialize};

/// Largest accepted row or column count.
pub const MAX_GRID_DIMENSION: usize = 2048;

/// Largest accepted total cell count.
pub const MAX_GRID_CELLS: usize = 1 << 22;

/// A validated, row-major matrix of optional index values.
///
/// Row 0 is the southern-most sampled row, as produced by the data service.
/// `rows` and `cols` are both at least 1 and every row has `cols` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl Grid {
    /// Validate and flatten a nested row list.
    ///
    /// Dimensions are checked before the flat buffer is allocated.
    pub fn from_rows(rows: &[Vec<Option<f64>>]) -> Result<Self, GridError> {
        let first = rows.first().ok_or(GridError::Empty)?;
        let n_rows = rows.len();
        let n_cols = first.len();

        if n_cols == 0 {
            return Err(GridError::Empty);
        }

        check_dimensions(n_rows, n_cols)?;

        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i, r.len()))
            .find(|&(_, len)| len != n_cols)
        {
            return Err(GridError::RaggedRow {
                row,
                expected: n_cols,
                found,
            });
        }

        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            cells.extend(row.iter().map(|v| v.filter(|x| x.is_finite())));
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            cells,
        })
    }

    /// Build a grid from an already flattened row-major buffer.
    pub fn from_flat(rows: usize, cols: usize, cells: Vec<Option<f64>>) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty);
        }
        check_dimensions(rows, cols)?;
        if cells.len() != rows * cols {
            return Err(GridError::CellCountMismatch {
                expected: rows * cols,
                found: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a validated grid; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value at (row, col); `None` when absent or out of bounds.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Iterate over one row's cells.
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Number of cells carrying a value.
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

fn check_dimensions(rows: usize, cols: usize) -> Result<(), GridError> {
    if rows > MAX_GRID_DIMENSION
        || cols > MAX_GRID_DIMENSION
        || rows.saturating_mul(cols) > MAX_GRID_CELLS
    {
        return Err(GridError::TooLarge { rows, cols });
    }
    Ok(())
}

/// Malformed grid payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Grid is empty")]
    Empty,

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Grid {rows}x{cols} exceeds the {MAX_GRID_DIMENSION} per side / {MAX_GRID_CELLS} cell limit")]
    TooLarge { rows: usize, cols: usize },

    #[error("Grid buffer has {found} cells, expected {expected}")]
    CellCountMismatch { expected: usize, found: usize },
}
