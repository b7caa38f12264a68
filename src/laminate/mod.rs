//! Laminate constitutive model: plies, stacking, loads, and stress recovery

pub mod failure;
pub mod loads;
pub mod material;
pub mod ply;
pub mod recovery;
pub mod stack;

pub use failure::{CriterionKind, FailureCriterion, ReserveFactor};
pub use loads::{solve, LoadState, SolvedState, StrainState};
pub use material::{Material, Strength};
pub use ply::Ply;
pub use stack::{DParameters, Laminate};
