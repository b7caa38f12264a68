//! Numerical primitives for the laminate and cut-out solvers

pub mod complex;
pub mod dense;
pub mod poly;

use num_complex::Complex64;

pub use dense::{det3, exchange, invert3, lu_solve, lu_solve6, spd_inverse6, spd_solve};
pub use dense::{Mat3, Mat6, Vec6};
pub use poly::{roots, solve_quadratic};

/// Shorthand for the complex scalar used throughout the cut-out solver.
pub type C64 = Complex64;
