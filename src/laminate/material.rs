//! Orthotropic ply material properties

use crate::error::{CltError, CltResult};
use serde::{Deserialize, Serialize};

/// Strength values of a unidirectional ply, used by the failure criteria.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Strength {
    /// Tensile strength parallel to the fibers (MPa)
    pub r_par_t: f64,
    /// Compressive strength parallel to the fibers (MPa, positive)
    pub r_par_c: f64,
    /// Tensile strength transverse to the fibers (MPa)
    pub r_nor_t: f64,
    /// Compressive strength transverse to the fibers (MPa, positive)
    pub r_nor_c: f64,
    /// In-plane shear strength (MPa)
    pub r_shear: f64,
}

impl Default for Strength {
    fn default() -> Self {
        // Generic carbon/epoxy order of magnitude
        Self {
            r_par_t: 1500.0,
            r_par_c: 1000.0,
            r_nor_t: 50.0,
            r_nor_c: 150.0,
            r_shear: 70.0,
        }
    }
}

/// Engineering constants of a unidirectional ply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus parallel to the fibers (MPa)
    pub e_par: f64,
    /// Modulus transverse to the fibers (MPa)
    pub e_nor: f64,
    /// Major Poisson's ratio
    pub nu12: f64,
    /// In-plane shear modulus (MPa)
    pub g: f64,
    /// Thermal expansion parallel / transverse (1/K)
    pub alpha_par: f64,
    pub alpha_nor: f64,
    /// Hygral (moisture) expansion parallel / transverse (1/%)
    pub beta_par: f64,
    pub beta_nor: f64,
    /// Density (g/cm^3)
    pub rho: f64,
    /// Strength set for failure evaluation
    pub strength: Strength,
}

impl Material {
    /// Create a new orthotropic material from engineering constants.
    pub fn new(e_par: f64, e_nor: f64, nu12: f64, g: f64, rho: f64) -> CltResult<Self> {
        if e_par <= 0.0 || e_nor <= 0.0 || g <= 0.0 {
            return Err(CltError::InvalidMaterial(
                "elastic moduli must be positive".to_string(),
            ));
        }
        if nu12 <= -1.0 || nu12 >= 1.0 {
            return Err(CltError::InvalidMaterial(
                "Poisson's ratio must be in (-1, 1)".to_string(),
            ));
        }
        Ok(Self {
            e_par,
            e_nor,
            nu12,
            g,
            alpha_par: 0.0,
            alpha_nor: 0.0,
            beta_par: 0.0,
            beta_nor: 0.0,
            rho,
            strength: Strength::default(),
        })
    }

    /// Set thermal expansion coefficients
    pub fn with_thermal_expansion(mut self, alpha_par: f64, alpha_nor: f64) -> Self {
        self.alpha_par = alpha_par;
        self.alpha_nor = alpha_nor;
        self
    }

    /// Set hygral expansion coefficients
    pub fn with_hygral_expansion(mut self, beta_par: f64, beta_nor: f64) -> Self {
        self.beta_par = beta_par;
        self.beta_nor = beta_nor;
        self
    }

    /// Set the strength values
    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    /// Create an isotropic material from E and nu.
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> CltResult<Self> {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, e, nu, g, rho)
    }

    /// Standard high-tenacity carbon/epoxy UD ply
    pub fn cfrp() -> Self {
        Self {
            e_par: 141_000.0,
            e_nor: 9_340.0,
            nu12: 0.35,
            g: 4_500.0,
            alpha_par: -0.3e-6,
            alpha_nor: 28.0e-6,
            beta_par: 0.0,
            beta_nor: 0.44,
            rho: 1.7,
            strength: Strength {
                r_par_t: 2_200.0,
                r_par_c: 1_850.0,
                r_nor_t: 55.0,
                r_nor_c: 200.0,
                r_shear: 120.0,
            },
        }
    }

    /// Standard E-glass/epoxy UD ply
    pub fn gfrp() -> Self {
        Self {
            e_par: 45_000.0,
            e_nor: 10_000.0,
            nu12: 0.3,
            g: 5_000.0,
            alpha_par: 7.0e-6,
            alpha_nor: 30.0e-6,
            beta_par: 0.0,
            beta_nor: 0.3,
            rho: 2.0,
            strength: Strength {
                r_par_t: 1_100.0,
                r_par_c: 675.0,
                r_nor_t: 35.0,
                r_nor_c: 120.0,
                r_shear: 80.0,
            },
        }
    }

    /// Minor Poisson's ratio nu21 = nu12 * E_nor / E_par
    pub fn nu21(&self) -> f64 {
        self.nu12 * self.e_nor / self.e_par
    }
}
