//! Hole loading quantities for symmetric laminates
//!
//! Two sub-solvers share one root-finding and boundary-matching pattern. The
//! force branch works on the normalized in-plane compliance; the moment
//! branch on the normalized off-axis flexural moduli, with its longer
//! multiplier chain. Both reduce the traction-free hole condition to one
//! small complex 2x2 system per Laurent mode.

use crate::cutout::geometry::HoleGeometry;
use crate::cutout::potentials::{ModeCoeff, PlaneMap};
use crate::error::{CltError, CltResult};
use crate::laminate::stack::Laminate;
use crate::math::complex::checked_div;
use crate::math::{invert3, poly, C64, Mat3};
use log::debug;
use nalgebra::Vector3;

/// Relative root separation below which the conjugate-pair representatives
/// are treated as degenerate (quasi-isotropic laminate)
const ROOT_DEGENERACY_TOL: f64 = 1e-3;

/// Relative nudge applied to the second root in the degenerate case
const ROOT_NUDGE: f64 = 1e-4;

/// Select the representative of each adjacent conjugate pair.
///
/// The quadratic solver emits the positive-imaginary member first, so this
/// takes roots[2*i]. The selection rule is part of the source formulas and
/// must not be changed (see DESIGN.md).
fn select_pair(roots: &[C64]) -> CltResult<(C64, C64)> {
    let s1 = roots[0];
    let mut s2 = roots[2];
    if s1.im == 0.0 || s2.im == 0.0 {
        return Err(CltError::InvalidInput(
            "characteristic roots must be complex".to_string(),
        ));
    }
    if (s1 - s2).norm() < ROOT_DEGENERACY_TOL * (s1.norm() + s2.norm()) {
        s2 = s1 * (1.0 + ROOT_NUDGE);
        debug!("degenerate characteristic roots, nudged s2 to {s2}");
    }
    Ok((s1, s2))
}

/// Solve the 2x2 boundary system for one Laurent mode:
/// A1 + A2 = p, s1*A1 + s2*A2 = q
fn mode_solve(s1: C64, s2: C64, p: C64, q: C64) -> CltResult<[C64; 2]> {
    let den = s2 - s1;
    Ok([
        checked_div(p * s2 - q, den)?,
        checked_div(q - s1 * p, den)?,
    ])
}

/// In-plane (force) hole quantities of a symmetric laminate
#[derive(Debug, Clone)]
pub struct SymmetricForceQuantities {
    /// Representative roots s1, s2 of the in-plane characteristic quartic
    pub roots: [C64; 2],
    /// Remote-load potential constants: B (real) and B' + i*C'
    pub gamma: [C64; 2],
    /// Contour description per affine plane
    pub planes: [PlaneMap; 2],
    /// Correction-series coefficients per Laurent mode
    pub modes: Vec<ModeCoeff>,
}

impl SymmetricForceQuantities {
    /// Build the force-branch quantities for remote membrane loading
    /// [Nx, Ny, Nxy].
    pub fn new(laminate: &Laminate, geom: &HoleGeometry, n_remote: [f64; 3]) -> CltResult<Self> {
        let c = laminate.membrane_compliance()?;
        let (a11, a12, a16) = (c[(0, 0)], c[(0, 1)], c[(0, 2)]);
        let (a22, a26, a66) = (c[(1, 1)], c[(1, 2)], c[(2, 2)]);

        // a11*s^4 - 2*a16*s^3 + (2*a12 + a66)*s^2 - 2*a26*s + a22 = 0
        let coeffs = [a22, -2.0 * a26, 2.0 * a12 + a66, -2.0 * a16, a11];
        let roots = poly::roots(&coeffs)?;
        let (s1, s2) = select_pair(&roots)?;

        let planes = [PlaneMap::new(geom, s1), PlaneMap::new(geom, s2)];

        // Remote-load constants from
        //   Nx = 2 Re[s1^2 B + s2^2 (B' + iC')]
        //   Ny = 2 Re[B + B' + iC']
        //   Nxy = -2 Re[s1 B + s2 (B' + iC')]
        let (s1sq, s2sq) = (s1 * s1, s2 * s2);
        let m = Mat3::new(
            2.0 * s1sq.re,
            2.0 * s2sq.re,
            -2.0 * s2sq.im,
            2.0,
            2.0,
            0.0,
            -2.0 * s1.re,
            -2.0 * s2.re,
            2.0 * s2.im,
        );
        let sol = invert3(&m)? * Vector3::new(n_remote[0], n_remote[1], n_remote[2]);
        let gamma = [C64::new(sol[0], 0.0), C64::new(sol[1], sol[2])];

        let modes = boundary_modes(geom, &planes, [gamma[0], gamma[1]], [s1, s2])?;

        Ok(Self {
            roots: [s1, s2],
            gamma,
            planes,
            modes,
        })
    }
}

/// Bending (moment) hole quantities of a symmetric laminate
#[derive(Debug, Clone)]
pub struct SymmetricMomentQuantities {
    /// Representative roots p, q of the bending characteristic quartic
    pub roots: [C64; 2],
    /// Remote-moment potential constants
    pub gamma: [C64; 2],
    pub planes: [PlaneMap; 2],
    /// Moment recovery multipliers per root: Mx, My, Mxy rows
    pub mult_p: [C64; 2],
    pub mult_r: [C64; 2],
    pub mult_s: [C64; 2],
    /// Transverse-force weights T_j = S_j + s_j * R_j
    pub mult_t: [C64; 2],
    /// Correction-series coefficients of the T-weighted potentials
    pub modes: Vec<ModeCoeff>,
}

impl SymmetricMomentQuantities {
    /// Build the moment-branch quantities for remote moments [Mx, My, Mxy].
    pub fn new(laminate: &Laminate, geom: &HoleGeometry, m_remote: [f64; 3]) -> CltResult<Self> {
        // Normalized off-axis flexural moduli (Tsai & Hahn): 12 D / h^3.
        // The deflection characteristic equation is insensitive to the
        // normalization; the potential constants are not.
        let df = laminate.flexural_moduli();
        let (d11, d12, d16) = (df[(0, 0)], df[(0, 1)], df[(0, 2)]);
        let (d22, d26, d66) = (df[(1, 1)], df[(1, 2)], df[(2, 2)]);

        // d11 + 4*d16*s + 2*(d12 + 2*d66)*s^2 + 4*d26*s^3 + d22*s^4 = 0
        let coeffs = [
            d11,
            4.0 * d16,
            2.0 * (d12 + 2.0 * d66),
            4.0 * d26,
            d22,
        ];
        let roots = poly::roots(&coeffs)?;
        let (p1, p2) = select_pair(&roots)?;

        let planes = [PlaneMap::new(geom, p1), PlaneMap::new(geom, p2)];

        // Multiplier chain: moment rows per unit curvature potential
        let mult = |s: C64| -> (C64, C64, C64, C64) {
            let p = d11 + d12 * s * s + 2.0 * d16 * s;
            let r = d12 + d22 * s * s + 2.0 * d26 * s;
            let q = d16 + d26 * s * s + 2.0 * d66 * s;
            let t = q + s * r;
            (p, r, q, t)
        };
        let (p_1, r_1, s_1, t_1) = mult(p1);
        let (p_2, r_2, s_2, t_2) = mult(p2);

        // Remote constants from Mi = -2 Re[sum_j mult_j Gamma_j]
        let m = Mat3::new(
            -2.0 * p_1.re,
            -2.0 * p_2.re,
            2.0 * p_2.im,
            -2.0 * r_1.re,
            -2.0 * r_2.re,
            2.0 * r_2.im,
            -2.0 * s_1.re,
            -2.0 * s_2.re,
            2.0 * s_2.im,
        );
        let sol = invert3(&m)? * Vector3::new(m_remote[0], m_remote[1], m_remote[2]);
        let gamma = [C64::new(sol[0], 0.0), C64::new(sol[1], sol[2])];

        // The boundary series is matched on the T-weighted potentials, which
        // restores the same (1, s_j) pairing as the force branch.
        let modes = boundary_modes(
            geom,
            &planes,
            [t_1 * gamma[0], t_2 * gamma[1]],
            [p1, p2],
        )?;

        Ok(Self {
            roots: [p1, p2],
            gamma,
            planes,
            mult_p: [p_1, p_2],
            mult_r: [r_1, r_2],
            mult_s: [s_1, s_2],
            mult_t: [t_1, t_2],
            modes,
        })
    }
}

/// Match the remote boundary series mode by mode.
///
/// For each Laurent mode k present in the mapped contour, the correction
/// coefficients solve
///
/// ```text
/// A1k + A2k           = -(sum_j w_j * z_j[-k] + conj(w_j * z_j[+k]))
/// s1*A1k + s2*A2k     = -(sum_j s_j * w_j * z_j[-k] + conj(s_j * w_j * z_j[+k]))
/// ```
///
/// where w_j are the remote weights (Gamma_j for the force branch,
/// T_j*Gamma_j for the moment branch).
fn boundary_modes(
    geom: &HoleGeometry,
    planes: &[PlaneMap; 2],
    weights: [C64; 2],
    roots: [C64; 2],
) -> CltResult<Vec<ModeCoeff>> {
    let mut modes = Vec::new();
    for k in geom.mode_set() {
        let mut p = C64::new(0.0, 0.0);
        let mut q = C64::new(0.0, 0.0);
        for j in 0..2 {
            let term_minus = weights[j] * planes[j].coeff_minus(k);
            let term_plus = weights[j] * planes[j].coeff_plus(k);
            p -= term_minus + term_plus.conj();
            q -= roots[j] * term_minus + (roots[j] * term_plus).conj();
        }
        let a = mode_solve(roots[0], roots[1], p, q)?;
        modes.push(ModeCoeff { k, a: a.to_vec() });
    }
    Ok(modes)
}
