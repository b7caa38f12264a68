//! Result types exposed to collaborators

use crate::laminate::failure::ReserveFactor;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Membrane and flexural engineering constants of a laminate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineeringConstants {
    /// Membrane moduli with free transverse contraction (MPa)
    pub e_x: f64,
    pub e_y: f64,
    pub g_xy: f64,
    pub nu_xy: f64,
    pub nu_yx: f64,
    /// Membrane moduli with suppressed Poisson coupling (MPa)
    pub e_x_fixed: f64,
    pub e_y_fixed: f64,
    /// Flexural moduli with free transverse curvature (MPa)
    pub e_flex_x: f64,
    pub e_flex_y: f64,
    pub g_flex_xy: f64,
    pub nu_flex_xy: f64,
    /// Flexural moduli with suppressed Poisson coupling (MPa)
    pub e_flex_x_fixed: f64,
    pub e_flex_y_fixed: f64,
}

/// Areal mass and rotatory inertia of a symmetric laminate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassMoments {
    /// Areal mass per unit surface
    pub m0: f64,
    /// Rotatory inertia about the mid-plane
    pub m2: f64,
}

/// Stress/strain state at one ply surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlySurfaceState {
    /// Through-thickness position (mm, from the laminate reference plane)
    pub z: f64,
    /// Mechanical strain in ply axes [eps1, eps2, gamma12]
    pub strain_local: Vector3<f64>,
    /// Stress in ply axes [s1, s2, t12] (MPa)
    pub stress_local: Vector3<f64>,
    /// Stress back-rotated into laminate axes [sx, sy, txy] (MPa)
    pub stress_global: Vector3<f64>,
    /// Failure criterion evaluation at this surface
    pub reserve: ReserveFactor,
}

/// Recovery result for one ply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlyResult {
    pub ply_index: usize,
    pub top: PlySurfaceState,
    pub bottom: PlySurfaceState,
}

impl PlyResult {
    /// A ply counts as failed when either surface drops below a reserve
    /// factor of one.
    pub fn is_failed(&self) -> bool {
        self.top.reserve.minimal_reserve_factor < 1.0
            || self.bottom.reserve.minimal_reserve_factor < 1.0
    }

    /// The smaller of the two surface reserve factors
    pub fn min_reserve_factor(&self) -> f64 {
        self.top
            .reserve
            .minimal_reserve_factor
            .min(self.bottom.reserve.minimal_reserve_factor)
    }
}
