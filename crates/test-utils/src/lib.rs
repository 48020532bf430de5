//! Test support for the aq-overlay workspace.
//!
//! - `fixtures`: viewports and canned data-service payloads
//! - `generators`: synthetic grids and hourly series
//! - float and plot-coordinate assertions
//!
//! Pulled in as a dev-dependency only:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Assert two numbers differ by no more than `epsilon`.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(415.0001, 415.0, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        let diff = (left - right).abs();
        assert!(
            diff <= epsilon,
            "values differ: left {:?}, right {:?}, diff {:?} exceeds {:?}",
            left,
            right,
            diff,
            epsilon
        );
    }};
}

/// Assert two plot points `(x, y)` match within `epsilon` on both axes.
///
/// ```ignore
/// use test_utils::assert_point_approx_eq;
///
/// assert_point_approx_eq!((50.0001, 250.0), (50.0, 250.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_point_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}
