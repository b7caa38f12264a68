//! Ply failure criteria
//!
//! A small closed set of criteria behind one capability trait. The stress
//! recovery engine only depends on the result contract: a minimal reserve
//! factor (>1 = safe) and the name of the governing failure mode.

use crate::laminate::material::Material;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Result of a failure criterion evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveFactor {
    /// Load multiplier to failure; values below 1.0 mean the ply has failed
    pub minimal_reserve_factor: f64,
    /// Name of the governing failure mode
    pub failure_name: String,
}

/// A ply failure criterion evaluated on local (fiber-axis) stresses
pub trait FailureCriterion {
    /// Reserve factor for the given local stress vector [s1, s2, t12]
    fn reserve_factor(&self, material: &Material, stress: &Vector3<f64>) -> ReserveFactor;
}

/// The criteria shipped with the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CriterionKind {
    #[default]
    MaxStress,
    TsaiWu,
}

impl CriterionKind {
    /// Dispatch to the concrete criterion
    pub fn evaluate(&self, material: &Material, stress: &Vector3<f64>) -> ReserveFactor {
        match self {
            CriterionKind::MaxStress => MaxStress.reserve_factor(material, stress),
            CriterionKind::TsaiWu => TsaiWu.reserve_factor(material, stress),
        }
    }
}

/// Maximum stress criterion: each component checked against its strength
pub struct MaxStress;

impl FailureCriterion for MaxStress {
    fn reserve_factor(&self, material: &Material, stress: &Vector3<f64>) -> ReserveFactor {
        let st = &material.strength;
        let (s1, s2, t12) = (stress[0], stress[1], stress[2]);

        let rf_fiber = if s1 > 0.0 {
            st.r_par_t / s1
        } else if s1 < 0.0 {
            st.r_par_c / -s1
        } else {
            f64::INFINITY
        };
        let rf_matrix = if s2 > 0.0 {
            st.r_nor_t / s2
        } else if s2 < 0.0 {
            st.r_nor_c / -s2
        } else {
            f64::INFINITY
        };
        let rf_shear = if t12 != 0.0 {
            st.r_shear / t12.abs()
        } else {
            f64::INFINITY
        };

        let (rf, name) = [
            (rf_fiber, "fiber"),
            (rf_matrix, "matrix"),
            (rf_shear, "shear"),
        ]
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap())
        .unwrap();

        ReserveFactor {
            minimal_reserve_factor: rf,
            failure_name: format!("max stress ({name})"),
        }
    }
}

/// Tsai-Wu interactive criterion with the default -1/2 interaction term
pub struct TsaiWu;

impl FailureCriterion for TsaiWu {
    fn reserve_factor(&self, material: &Material, stress: &Vector3<f64>) -> ReserveFactor {
        let st = &material.strength;
        let (s1, s2, t12) = (stress[0], stress[1], stress[2]);

        let f11 = 1.0 / (st.r_par_t * st.r_par_c);
        let f22 = 1.0 / (st.r_nor_t * st.r_nor_c);
        let f66 = 1.0 / (st.r_shear * st.r_shear);
        let f1 = 1.0 / st.r_par_t - 1.0 / st.r_par_c;
        let f2 = 1.0 / st.r_nor_t - 1.0 / st.r_nor_c;
        let f12 = -0.5 * (f11 * f22).sqrt();

        // Quadratic in the load multiplier R: a*R^2 + b*R = 1
        let a = f11 * s1 * s1 + f22 * s2 * s2 + f66 * t12 * t12 + 2.0 * f12 * s1 * s2;
        let b = f1 * s1 + f2 * s2;

        let rf = if a.abs() < 1e-30 {
            if b > 0.0 {
                1.0 / b
            } else {
                f64::INFINITY
            }
        } else {
            (-b + (b * b + 4.0 * a).sqrt()) / (2.0 * a)
        };

        ReserveFactor {
            minimal_reserve_factor: rf,
            failure_name: "Tsai-Wu".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_max_stress_fiber_tension() {
        let mat = Material::cfrp();
        let rf = CriterionKind::MaxStress.evaluate(&mat, &Vector3::new(1100.0, 0.0, 0.0));
        assert_relative_eq!(
            rf.minimal_reserve_factor,
            mat.strength.r_par_t / 1100.0,
            epsilon = 1e-12
        );
        assert!(rf.failure_name.contains("fiber"));
    }

    #[test]
    fn test_max_stress_governing_mode() {
        let mat = Material::cfrp();
        // Transverse stress near its (much lower) strength governs
        let rf = CriterionKind::MaxStress.evaluate(&mat, &Vector3::new(100.0, 50.0, 0.0));
        assert!(rf.failure_name.contains("matrix"));
        assert!(rf.minimal_reserve_factor > 1.0);
    }

    #[test]
    fn test_tsai_wu_uniaxial_matches_strength() {
        let mat = Material::cfrp();
        // Pure shear: quadratic reduces to R = r_shear/|t12|
        let rf = CriterionKind::TsaiWu.evaluate(&mat, &Vector3::new(0.0, 0.0, 60.0));
        assert_relative_eq!(
            rf.minimal_reserve_factor,
            mat.strength.r_shear / 60.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_stress_is_safe() {
        let mat = Material::cfrp();
        let rf = CriterionKind::MaxStress.evaluate(&mat, &Vector3::zeros());
        assert!(rf.minimal_reserve_factor.is_infinite());
    }
}
