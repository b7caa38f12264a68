//! Load and strain state of a laminate, and the mixed-mask constitutive solve
//!
//! Any of the six generalized resultants can be traded for its matching
//! generalized strain as the prescribed quantity, selected by the
//! `use_strain` mask. The solve exchanges the masked rows of the ABD system
//! and runs the LU path, so all 64 prescribed-force/prescribed-strain
//! combinations go through one code path.

use crate::error::CltResult;
use crate::laminate::stack::Laminate;
use crate::math::{exchange, lu_solve6, Vec6};
use serde::{Deserialize, Serialize};

/// Generalized force/moment resultants plus the hygrothermal environment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoadState {
    /// Membrane forces (N/mm)
    pub n_x: f64,
    pub n_y: f64,
    pub n_xy: f64,
    /// Moments (N)
    pub m_x: f64,
    pub m_y: f64,
    pub m_xy: f64,
    /// Temperature change (K)
    pub delta_t: f64,
    /// Moisture change (%)
    pub delta_h: f64,
    /// Rows where the generalized strain is prescribed instead of the force
    pub use_strain: [bool; 6],
}

impl LoadState {
    /// Pure mechanical in-plane loading
    pub fn membrane(n_x: f64, n_y: f64, n_xy: f64) -> Self {
        Self {
            n_x,
            n_y,
            n_xy,
            ..Self::default()
        }
    }

    pub fn with_moments(mut self, m_x: f64, m_y: f64, m_xy: f64) -> Self {
        self.m_x = m_x;
        self.m_y = m_y;
        self.m_xy = m_xy;
        self
    }

    pub fn with_thermal(mut self, delta_t: f64) -> Self {
        self.delta_t = delta_t;
        self
    }

    pub fn with_moisture(mut self, delta_h: f64) -> Self {
        self.delta_h = delta_h;
        self
    }

    /// Prescribe the strain on row `i` (0..6) instead of the resultant
    pub fn prescribe_strain(mut self, i: usize) -> Self {
        self.use_strain[i] = true;
        self
    }

    pub fn as_vector(&self) -> Vec6 {
        Vec6::new(self.n_x, self.n_y, self.n_xy, self.m_x, self.m_y, self.m_xy)
    }

    pub fn from_vector(v: &Vec6, delta_t: f64, delta_h: f64, use_strain: [bool; 6]) -> Self {
        Self {
            n_x: v[0],
            n_y: v[1],
            n_xy: v[2],
            m_x: v[3],
            m_y: v[4],
            m_xy: v[5],
            delta_t,
            delta_h,
            use_strain,
        }
    }
}

/// Generalized mid-plane strains and curvatures
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StrainState {
    pub eps_x: f64,
    pub eps_y: f64,
    pub gamma_xy: f64,
    /// Curvatures (1/mm)
    pub kappa_x: f64,
    pub kappa_y: f64,
    pub kappa_xy: f64,
}

impl StrainState {
    pub fn as_vector(&self) -> Vec6 {
        Vec6::new(
            self.eps_x,
            self.eps_y,
            self.gamma_xy,
            self.kappa_x,
            self.kappa_y,
            self.kappa_xy,
        )
    }

    pub fn from_vector(v: &Vec6) -> Self {
        Self {
            eps_x: v[0],
            eps_y: v[1],
            gamma_xy: v[2],
            kappa_x: v[3],
            kappa_y: v[4],
            kappa_xy: v[5],
        }
    }
}

/// Result of the mixed-mask constitutive solve.
///
/// `loads` and `strains` hold purely mechanical quantities (hygrothermal
/// parts removed from the solved rows); `total_strains` keeps the actual
/// deformation including the hygrothermal response, which is what ply-level
/// stress recovery consumes.
#[derive(Debug, Clone)]
pub struct SolvedState {
    pub loads: LoadState,
    pub strains: StrainState,
    pub total_strains: Vec6,
    pub hygrothermal_forces: Vec6,
}

/// Solve the laminate constitutive system for a mixed set of prescribed
/// forces and strains.
///
/// Rows with `use_strain` set take their value from `strains`; all other
/// rows take the mechanical resultant from `loads` plus the hygrothermal
/// resultant. The solved-for strain rows are reported with the hygrothermal
/// contribution removed, the solved-for force rows likewise.
pub fn solve(laminate: &Laminate, loads: &LoadState, strains: &StrainState) -> CltResult<SolvedState> {
    let mask = loads.use_strain;
    let n_ht = laminate.hygrothermal_forces(loads.delta_t, loads.delta_h);
    let f_mech = loads.as_vector();
    let eps_in = strains.as_vector();

    let mut rhs = Vec6::zeros();
    for i in 0..6 {
        rhs[i] = if mask[i] {
            eps_in[i]
        } else {
            f_mech[i] + n_ht[i]
        };
    }

    let exchanged = exchange(laminate.abd(), &mask)?;
    let sol = lu_solve6(&exchanged, &rhs)?;

    // Free hygrothermal deformation, used to split solved strains into
    // mechanical and hygrothermal parts.
    let eps_ht = laminate.abd_inverse() * n_ht;

    let mut f_out = f_mech;
    let mut eps_mech = eps_in;
    let mut eps_total = eps_in;
    for i in 0..6 {
        if mask[i] {
            f_out[i] = sol[i] - n_ht[i];
        } else {
            eps_total[i] = sol[i];
            eps_mech[i] = sol[i] - eps_ht[i];
        }
    }

    Ok(SolvedState {
        loads: LoadState::from_vector(&f_out, loads.delta_t, loads.delta_h, mask),
        strains: StrainState::from_vector(&eps_mech),
        total_strains: eps_total,
        hygrothermal_forces: n_ht,
    })
}
