//! CLT Solver - laminate analysis with an anisotropic cut-out stress solver
//!
//! This library implements classical laminated plate theory for fiber
//! composite laminates:
//! - Ply stiffness rotation and ABD assembly with compliance inversion
//! - Mixed prescribed-force/prescribed-strain constitutive solves
//! - Hygrothermal loading and ply-level stress recovery with pluggable
//!   failure criteria
//! - Stress concentration around circular, elliptical and square cut-outs
//!   via Lekhnitskii-style complex stress potentials, for symmetric and
//!   unsymmetric (coupled) laminates
//!
//! ## Example
//! ```rust
//! use clt_solver::prelude::*;
//!
//! // A [0/90]s carbon/epoxy laminate
//! let laminate = Laminate::symmetric_from_angles(
//!     &Material::cfrp(), &[0.0, 90.0], 0.125,
//! ).unwrap();
//!
//! // Membrane load, solve for mid-plane strains
//! let loads = LoadState::membrane(100.0, 0.0, 0.0);
//! let solved = solve(&laminate, &loads, &StrainState::default()).unwrap();
//!
//! // Ply stresses and reserve factors
//! let ply_results = recover_all(&laminate, &solved);
//! assert!(!ply_results[0].is_failed());
//!
//! // Hoop force around a circular hole under the same load
//! let case = CutoutCase::new(HoleShape::Circle { a: 2.0 })
//!     .with_membrane(100.0, 0.0, 0.0);
//! let result = CutoutSolver::new(&laminate).solve(&case).unwrap();
//! let (peak_index, peak) = result.peak_n_theta();
//! assert!(peak.abs() > 100.0);
//! assert!(peak_index < result.n_theta.len());
//! ```

pub mod cutout;
pub mod error;
pub mod laminate;
pub mod math;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::cutout::{
        CutoutCase, CutoutResult, CutoutSolver, HoleGeometry, HoleShape, DEFAULT_SAMPLES,
    };
    pub use crate::error::{CltError, CltResult};
    pub use crate::laminate::recovery::{recover_all, recover_at, recover_ply};
    pub use crate::laminate::{
        solve, CriterionKind, DParameters, FailureCriterion, Laminate, LoadState, Material, Ply,
        ReserveFactor, SolvedState, StrainState, Strength,
    };
    pub use crate::results::{EngineeringConstants, MassMoments, PlyResult, PlySurfaceState};
}
