//! Boundary evaluation of the complex stress functions
//!
//! Each characteristic root s maps the physical hole contour into an affine
//! plane z_s = x + s*y. On the unit circle the mapped contour is a finite
//! Laurent series whose coefficients combine the hole's m_k with the root
//! terms a = 1 + i*s and b = 1 - i*s. The stress functions are Laurent
//! series in the parametric variable; physical resultants come from the
//! ratio of the series derivative and the mapping derivative.

use crate::cutout::geometry::HoleGeometry;
use crate::error::CltResult;
use crate::math::complex::{checked_div, powi};
use crate::math::C64;

/// Laurent description of the hole contour in one affine plane
#[derive(Debug, Clone)]
pub struct PlaneMap {
    /// Characteristic root s of this plane
    pub s: C64,
    /// a = 1 + i*s
    pub a: C64,
    /// b = 1 - i*s
    pub b: C64,
    /// Mapping scale R
    scale: f64,
    /// Hole Laurent coefficients (k, m_k)
    coeffs: Vec<(u32, f64)>,
}

impl PlaneMap {
    pub fn new(geom: &HoleGeometry, s: C64) -> Self {
        let i = C64::new(0.0, 1.0);
        Self {
            s,
            a: C64::new(1.0, 0.0) + i * s,
            b: C64::new(1.0, 0.0) - i * s,
            scale: geom.scale(),
            coeffs: geom.coeffs().to_vec(),
        }
    }

    fn m_at(&self, k: u32) -> f64 {
        self.coeffs
            .iter()
            .find(|&&(kk, _)| kk == k)
            .map(|&(_, m)| m)
            .unwrap_or(0.0)
    }

    /// Coefficient of sigma^{+k} in the mapped contour z_s(sigma)
    pub fn coeff_plus(&self, k: u32) -> C64 {
        let half = self.scale / 2.0;
        if k == 1 {
            (self.b + self.a * self.m_at(1)) * half
        } else {
            self.a * (self.m_at(k) * half)
        }
    }

    /// Coefficient of sigma^{-k} in the mapped contour z_s(sigma)
    pub fn coeff_minus(&self, k: u32) -> C64 {
        let half = self.scale / 2.0;
        if k == 1 {
            (self.a + self.b * self.m_at(1)) * half
        } else {
            self.b * (self.m_at(k) * half)
        }
    }

    /// Derivative of the mapping function evaluated on the unit circle
    pub fn w_deriv(&self, sigma: C64) -> CltResult<C64> {
        let half = self.scale / 2.0;
        let mut d = self.b - self.a * powi(sigma, -2)?;
        for &(k, m) in &self.coeffs {
            let kf = k as f64;
            d += (self.a * powi(sigma, k as i32 - 1)? - self.b * powi(sigma, -(k as i32) - 1)?)
                * (kf * m);
        }
        Ok(d * half)
    }
}

/// One Laurent mode of a correction potential: coefficients of sigma^{-k}
/// for each affine plane
#[derive(Debug, Clone)]
pub struct ModeCoeff {
    pub k: u32,
    pub a: Vec<C64>,
}

/// Derivative of a correction series at `sigma`: sum over modes of
/// -k * A_k * sigma^{-k-1}, for plane `j`.
pub fn series_deriv(modes: &[ModeCoeff], j: usize, sigma: C64) -> CltResult<C64> {
    let mut d = C64::new(0.0, 0.0);
    for mode in modes {
        let kf = mode.k as f64;
        d += mode.a[j] * powi(sigma, -(mode.k as i32) - 1)? * (-kf);
    }
    Ok(d)
}

/// Stress-function value phi'(z) = series'(sigma) / w'(sigma) for plane `j`
pub fn phi_value(modes: &[ModeCoeff], plane: &PlaneMap, j: usize, sigma: C64) -> CltResult<C64> {
    let num = series_deriv(modes, j, sigma)?;
    let den = plane.w_deriv(sigma)?;
    checked_div(num, den)
}

/// Project the six resultants onto the contour tangent direction.
///
/// `alpha_deg` is the physical contour angle; the tangential (hoop) membrane
/// force and bending moment follow the standard stress transformation.
pub fn contour_projection(resultants: &[f64; 6], alpha_deg: f64) -> (f64, f64) {
    let (s, c) = alpha_deg.to_radians().sin_cos();
    let n_theta = resultants[0] * s * s + resultants[1] * c * c - 2.0 * resultants[2] * s * c;
    let m_theta = resultants[3] * s * s + resultants[4] * c * c - 2.0 * resultants[5] * s * c;
    (n_theta, m_theta)
}

/// Unit-circle point for a parametric angle in degrees
pub fn sigma_at(theta_deg: f64) -> C64 {
    let t = theta_deg.to_radians();
    C64::new(t.cos(), t.sin())
}
