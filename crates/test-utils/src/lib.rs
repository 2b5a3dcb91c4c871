//! Shared test utilities for the gridzarr workspace.
//!
//! Provides NetCDF file fixtures (with and without the variable/dimension
//! naming collision) and in-memory sample datasets, so source-loader, store
//! and conversion tests all exercise the same shapes.
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod datasets;
pub mod netcdf_files;

pub use datasets::sample_dataset;
pub use netcdf_files::{write_collision_file, write_simple_file, TILE_EDGE};

// Re-export so test crates get a scratch dir without their own dependency.
pub use tempfile;

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
