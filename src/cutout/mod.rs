//! Stress concentration around a cut-out in a loaded laminate
//!
//! Anisotropic complex-variable elasticity in the Lekhnitskii tradition:
//! the hole contour is a conformal distortion of the unit circle, the
//! laminate enters through the roots of its characteristic polynomials, and
//! the traction-free boundary is enforced mode by mode on Laurent-series
//! stress potentials.

pub mod geometry;
pub mod potentials;
pub mod solver;
pub mod symmetric;
pub mod unsymmetric;

pub use geometry::{HoleGeometry, HoleShape};
pub use solver::{CutoutCase, CutoutResult, CutoutSolver, DEFAULT_SAMPLES};
pub use symmetric::{SymmetricForceQuantities, SymmetricMomentQuantities};
pub use unsymmetric::UnsymmetricQuantities;
