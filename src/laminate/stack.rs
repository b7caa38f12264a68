//! Laminate: ordered ply stack and the derived stiffness snapshot
//!
//! All derived data (thickness integration, ABD, its inverse, symmetry flag,
//! non-dimensional parameters) is computed eagerly when the laminate is
//! built. Editing means building a new laminate; there is no listener-based
//! invalidation, a calculation always sees one consistent snapshot.

use crate::error::{CltError, CltResult};
use crate::laminate::material::Material;
use crate::laminate::ply::Ply;
use crate::math::{invert3, spd_inverse6, Mat3, Mat6, Vec6};
use crate::results::{EngineeringConstants, MassMoments};
use log::debug;
use serde::{Deserialize, Serialize};

/// Relative threshold on |B| below which a laminate counts as symmetric
const SYMMETRY_EPS: f64 = 1e-12;

/// Non-dimensional bending parameters derived from the D matrix
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DParameters {
    /// Seydel orthotropy parameter (D12 + 2 D66) / sqrt(D11 D22)
    pub beta_d: f64,
    /// Generalized bending Poisson ratio D12 / sqrt(D11 D22)
    pub nu_d: f64,
    /// Bending anisotropy parameter D16 / (D11^3 D22)^(1/4)
    pub gamma_d: f64,
    /// Bending anisotropy parameter D26 / (D11 D22^3)^(1/4)
    pub delta_d: f64,
}

/// A laminate with its derived stiffness data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laminate {
    plies: Vec<Ply>,
    offset: f64,

    thickness: f64,
    z_mid: Vec<f64>,
    a: Mat3,
    b: Mat3,
    d: Mat3,
    abd: Mat6,
    abd_inv: Mat6,
    symmetric: bool,
}

impl Laminate {
    /// Build a laminate from plies ordered top to bottom.
    ///
    /// The mid-plane z of each ply is measured from the laminate mid-plane
    /// shifted by `offset`.
    pub fn new(plies: Vec<Ply>, offset: f64) -> CltResult<Self> {
        if plies.is_empty() {
            return Err(CltError::EmptyLaminate);
        }

        let thickness: f64 = plies.iter().map(|p| p.thickness).sum();

        let mut z_mid = Vec::with_capacity(plies.len());
        let mut z = -thickness / 2.0 + offset;
        for ply in &plies {
            z_mid.push(z + ply.thickness / 2.0);
            z += ply.thickness;
        }

        let mut a = Mat3::zeros();
        let mut b = Mat3::zeros();
        let mut d = Mat3::zeros();
        for (ply, &zm) in plies.iter().zip(&z_mid) {
            let q = ply.q_global();
            let t = ply.thickness;
            a += q * t;
            b += q * (t * zm);
            d += q * (t * t * t / 12.0 + t * zm * zm);
        }

        // Upper-triangle block assembly, then mirror
        let mut abd = Mat6::zeros();
        for i in 0..3 {
            for j in 0..3 {
                if j >= i {
                    abd[(i, j)] = a[(i, j)];
                }
                abd[(i, j + 3)] = b[(i, j)];
                if j >= i {
                    abd[(i + 3, j + 3)] = d[(i, j)];
                }
            }
        }
        for i in 0..6 {
            for j in 0..i {
                abd[(i, j)] = abd[(j, i)];
            }
        }

        let abd_inv = spd_inverse6(&abd)?;

        let max_a = a.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
        let max_b = b.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
        let symmetric = max_b < SYMMETRY_EPS * max_a;

        debug!(
            "laminate built: {} plies, t = {:.4} mm, symmetric = {}",
            plies.len(),
            thickness,
            symmetric
        );

        Ok(Self {
            plies,
            offset,
            thickness,
            z_mid,
            a,
            b,
            d,
            abd,
            abd_inv,
            symmetric,
        })
    }

    /// Laminate with all plies of one material, given angles and a common
    /// ply thickness.
    pub fn from_angles(material: &Material, angles: &[f64], thickness: f64) -> CltResult<Self> {
        let plies = angles
            .iter()
            .map(|&a| Ply::new(material.clone(), a, thickness))
            .collect();
        Self::new(plies, 0.0)
    }

    /// Symmetric laminate built by mirroring the given upper half.
    pub fn symmetric_from_angles(
        material: &Material,
        half_angles: &[f64],
        thickness: f64,
    ) -> CltResult<Self> {
        let mut angles: Vec<f64> = half_angles.to_vec();
        angles.extend(half_angles.iter().rev());
        Self::from_angles(material, &angles, thickness)
    }

    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Mid-plane z coordinate of ply `k` (top surface is negative z)
    pub fn z_mid(&self, k: usize) -> f64 {
        self.z_mid[k]
    }

    /// Top and bottom z of ply `k`
    pub fn z_range(&self, k: usize) -> (f64, f64) {
        let half = self.plies[k].thickness / 2.0;
        (self.z_mid[k] - half, self.z_mid[k] + half)
    }

    pub fn a_matrix(&self) -> &Mat3 {
        &self.a
    }

    pub fn b_matrix(&self) -> &Mat3 {
        &self.b
    }

    pub fn d_matrix(&self) -> &Mat3 {
        &self.d
    }

    pub fn abd(&self) -> &Mat6 {
        &self.abd
    }

    pub fn abd_inverse(&self) -> &Mat6 {
        &self.abd_inv
    }

    /// Numerically negligible membrane-bending coupling.
    ///
    /// This does not require a geometrically symmetric stacking sequence,
    /// only max|B| < eps * max|A|.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// In-plane compliance of the A block, normalized by thickness
    /// (compliance of A/h).
    pub fn membrane_compliance(&self) -> CltResult<Mat3> {
        Ok(invert3(&(self.a / self.thickness))?)
    }

    /// Normalized off-axis flexural moduli 12 D / h^3 (Tsai & Hahn), as a
    /// closed-form summation over ply positions.
    pub fn flexural_moduli(&self) -> Mat3 {
        let h3 = self.thickness.powi(3);
        let mut df = Mat3::zeros();
        for (ply, &zm) in self.plies.iter().zip(&self.z_mid) {
            let t = ply.thickness;
            let (zl, zu) = (zm - t / 2.0, zm + t / 2.0);
            df += ply.q_global() * ((zu.powi(3) - zl.powi(3)) * 4.0 / h3);
        }
        df
    }

    /// Flexural compliance, inverse of the normalized flexural moduli.
    pub fn flexural_compliance(&self) -> CltResult<Mat3> {
        invert3(&self.flexural_moduli())
    }

    /// Non-dimensional D-matrix parameters
    pub fn d_parameters(&self) -> DParameters {
        let d = &self.d;
        let d11 = d[(0, 0)];
        let d22 = d[(1, 1)];
        let root = (d11 * d22).sqrt();
        DParameters {
            beta_d: (d[(0, 1)] + 2.0 * d[(2, 2)]) / root,
            nu_d: d[(0, 1)] / root,
            gamma_d: d[(0, 2)] / (d11.powi(3) * d22).powf(0.25),
            delta_d: d[(1, 2)] / (d11 * d22.powi(3)).powf(0.25),
        }
    }

    /// Membrane and flexural engineering constants of the laminate
    pub fn engineering_constants(&self) -> EngineeringConstants {
        let h = self.thickness;
        let alpha = self.abd_inv.fixed_view::<3, 3>(0, 0);
        let delta = self.abd_inv.fixed_view::<3, 3>(3, 3);
        let h3 = h * h * h;

        EngineeringConstants {
            e_x: 1.0 / (h * alpha[(0, 0)]),
            e_y: 1.0 / (h * alpha[(1, 1)]),
            g_xy: 1.0 / (h * alpha[(2, 2)]),
            nu_xy: -alpha[(0, 1)] / alpha[(0, 0)],
            nu_yx: -alpha[(0, 1)] / alpha[(1, 1)],
            e_x_fixed: self.a[(0, 0)] / h,
            e_y_fixed: self.a[(1, 1)] / h,
            e_flex_x: 12.0 / (h3 * delta[(0, 0)]),
            e_flex_y: 12.0 / (h3 * delta[(1, 1)]),
            g_flex_xy: 12.0 / (h3 * delta[(2, 2)]),
            nu_flex_xy: -delta[(0, 1)] / delta[(0, 0)],
            e_flex_x_fixed: 12.0 * self.d[(0, 0)] / h3,
            e_flex_y_fixed: 12.0 * self.d[(1, 1)] / h3,
        }
    }

    /// Areal mass and rotatory inertia. Only meaningful for symmetric
    /// laminates; unsymmetric stacks report an explicit error instead of a
    /// value computed about the wrong reference plane.
    pub fn mass_moments(&self) -> CltResult<MassMoments> {
        if !self.symmetric {
            return Err(CltError::SymmetricLaminateRequired("mass moments"));
        }
        let mut m0 = 0.0;
        let mut m2 = 0.0;
        for (ply, &zm) in self.plies.iter().zip(&self.z_mid) {
            let t = ply.thickness;
            m0 += ply.material.rho * t;
            m2 += ply.material.rho * (t * t * t / 12.0 + t * zm * zm);
        }
        Ok(MassMoments { m0, m2 })
    }

    /// Hygrothermal force and moment resultants [Nt; Mt] for a temperature
    /// change `dt` and moisture change `dh`.
    pub fn hygrothermal_forces(&self, dt: f64, dh: f64) -> Vec6 {
        let mut out = Vec6::zeros();
        if dt == 0.0 && dh == 0.0 {
            return out;
        }
        for (ply, &zm) in self.plies.iter().zip(&self.z_mid) {
            let eps = ply.alpha_global() * dt + ply.beta_global() * dh;
            let f = ply.q_global() * eps * ply.thickness;
            for i in 0..3 {
                out[i] += f[i];
                out[i + 3] += f[i] * zm;
            }
        }
        out
    }
}
