//! Single ply: material, fiber angle, thickness, and its rotated stiffness
//!
//! The reduced stiffness is rotated from fiber axes into laminate axes with
//! the closed-form fourth-order angle-power expressions; the expansion
//! coefficients use the second-order (strain-type) transformation.

use crate::laminate::failure::CriterionKind;
use crate::laminate::material::Material;
use crate::math::Mat3;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A single fiber-reinforced layer of a laminate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ply {
    /// Ply material
    pub material: Material,
    /// Fiber angle in degrees, measured from the laminate x-axis
    pub angle_deg: f64,
    /// Ply thickness (mm)
    pub thickness: f64,
    /// Failure criterion evaluated for this ply
    pub criterion: CriterionKind,
}

impl Ply {
    /// Create a new ply
    pub fn new(material: Material, angle_deg: f64, thickness: f64) -> Self {
        Self {
            material,
            angle_deg,
            thickness,
            criterion: CriterionKind::default(),
        }
    }

    /// Set the failure criterion
    pub fn with_criterion(mut self, criterion: CriterionKind) -> Self {
        self.criterion = criterion;
        self
    }

    /// Reduced stiffness in fiber axes.
    ///
    /// Q11 = E_par/(1 - nu12*nu21), Q22 = E_nor/(1 - nu12*nu21),
    /// Q12 = nu21*Q11, Q66 = G, Q16 = Q26 = 0.
    pub fn q_local(&self) -> Mat3 {
        let m = &self.material;
        let nu21 = m.nu21();
        let denom = 1.0 - m.nu12 * nu21;
        let q11 = m.e_par / denom;
        let q22 = m.e_nor / denom;
        let q12 = nu21 * q11;
        Mat3::new(q11, q12, 0.0, q12, q22, 0.0, 0.0, 0.0, m.g)
    }

    /// Reduced stiffness rotated into laminate axes.
    pub fn q_global(&self) -> Mat3 {
        let q = self.q_local();
        let (s, c) = self.angle_deg.to_radians().sin_cos();
        let (s2, c2) = (s * s, c * c);
        let (s3, c3) = (s2 * s, c2 * c);
        let (s4, c4) = (s2 * s2, c2 * c2);

        let (q11, q12, q22, q66) = (q[(0, 0)], q[(0, 1)], q[(1, 1)], q[(2, 2)]);

        let q11_g = q11 * c4 + 2.0 * (q12 + 2.0 * q66) * s2 * c2 + q22 * s4;
        let q12_g = (q11 + q22 - 4.0 * q66) * s2 * c2 + q12 * (s4 + c4);
        let q22_g = q11 * s4 + 2.0 * (q12 + 2.0 * q66) * s2 * c2 + q22 * c4;
        let q16_g = (q11 - q12 - 2.0 * q66) * s * c3 + (q12 - q22 + 2.0 * q66) * s3 * c;
        let q26_g = (q11 - q12 - 2.0 * q66) * s3 * c + (q12 - q22 + 2.0 * q66) * s * c3;
        let q66_g = (q11 + q22 - 2.0 * q12 - 2.0 * q66) * s2 * c2 + q66 * (s4 + c4);

        Mat3::new(
            q11_g, q12_g, q16_g, q12_g, q22_g, q26_g, q16_g, q26_g, q66_g,
        )
    }

    /// Thermal expansion vector [alpha_x, alpha_y, alpha_xy] in laminate axes.
    ///
    /// Second-order transformation; the engineering shear component carries
    /// the factor two.
    pub fn alpha_global(&self) -> Vector3<f64> {
        let m = &self.material;
        rotate_expansion(m.alpha_par, m.alpha_nor, self.angle_deg)
    }

    /// Hygral expansion vector [beta_x, beta_y, beta_xy] in laminate axes.
    pub fn beta_global(&self) -> Vector3<f64> {
        let m = &self.material;
        rotate_expansion(m.beta_par, m.beta_nor, self.angle_deg)
    }
}

fn rotate_expansion(par: f64, nor: f64, angle_deg: f64) -> Vector3<f64> {
    let (s, c) = angle_deg.to_radians().sin_cos();
    Vector3::new(
        par * c * c + nor * s * s,
        par * s * s + nor * c * c,
        2.0 * (par - nor) * s * c,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_q_local_isotropic() {
        let ply = Ply::new(Material::isotropic(70_000.0, 0.3, 2.7).unwrap(), 0.0, 0.125);
        let q = ply.q_local();
        assert_relative_eq!(q[(0, 0)], 70_000.0 / (1.0 - 0.09), epsilon = 1e-6);
        assert_relative_eq!(q[(0, 1)], 0.3 * q[(0, 0)], epsilon = 1e-6);
        assert_relative_eq!(q[(2, 2)], 70_000.0 / 2.6, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_by_90_swaps_axes() {
        let ply0 = Ply::new(Material::cfrp(), 0.0, 0.125);
        let ply90 = Ply::new(Material::cfrp(), 90.0, 0.125);
        let q0 = ply0.q_global();
        let q90 = ply90.q_global();
        assert_relative_eq!(q90[(0, 0)], q0[(1, 1)], epsilon = 1e-6);
        assert_relative_eq!(q90[(1, 1)], q0[(0, 0)], epsilon = 1e-6);
        assert_relative_eq!(q90[(0, 1)], q0[(0, 1)], epsilon = 1e-6);
        assert_relative_eq!(q90[(0, 2)], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rotation_invariant_trace() {
        // Q11 + Q22 + 2*Q12 is invariant under rotation
        let q0 = Ply::new(Material::cfrp(), 0.0, 0.125).q_global();
        let q45 = Ply::new(Material::cfrp(), 45.0, 0.125).q_global();
        let inv0 = q0[(0, 0)] + q0[(1, 1)] + 2.0 * q0[(0, 1)];
        let inv45 = q45[(0, 0)] + q45[(1, 1)] + 2.0 * q45[(0, 1)];
        assert_relative_eq!(inv0, inv45, epsilon = 1e-6 * inv0.abs());
    }

    #[test]
    fn test_isotropic_rotation_is_identity() {
        let mat = Material::isotropic(70_000.0, 0.3, 2.7).unwrap();
        let q0 = Ply::new(mat.clone(), 0.0, 0.2).q_global();
        let q30 = Ply::new(mat, 30.0, 0.2).q_global();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(q0[(i, j)], q30[(i, j)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_expansion_rotation() {
        let mat = Material::cfrp();
        let a0 = Ply::new(mat.clone(), 0.0, 0.125).alpha_global();
        assert_relative_eq!(a0[0], mat.alpha_par, epsilon = 1e-15);
        assert_relative_eq!(a0[1], mat.alpha_nor, epsilon = 1e-15);
        assert_relative_eq!(a0[2], 0.0, epsilon = 1e-15);

        let a45 = Ply::new(mat.clone(), 45.0, 0.125).alpha_global();
        let mean = 0.5 * (mat.alpha_par + mat.alpha_nor);
        assert_relative_eq!(a45[0], mean, epsilon = 1e-12);
        assert_relative_eq!(a45[1], mean, epsilon = 1e-12);
        assert_relative_eq!(a45[2], mat.alpha_par - mat.alpha_nor, epsilon = 1e-12);
    }
}
