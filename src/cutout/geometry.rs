//! Conformal-mapping description of the hole contour
//!
//! Every supported cut-out is a distortion of the unit circle described by a
//! scale R and Laurent coefficients m_k:
//!
//! ```text
//! x(theta) = R * (cos(theta) + sum_k m_k * cos(k*theta))
//! y(theta) = R * (sin(theta) - sum_k m_k * sin(k*theta))
//! ```
//!
//! The shapes differ only in how R and m_k derive from the characteristic
//! lengths, so they are a tagged variant, not a class hierarchy.

use serde::{Deserialize, Serialize};

/// Rounded-corner square mapping coefficient (third Laurent term)
const SQUARE_M3: f64 = -1.0 / 6.0;

/// Supported cut-out contours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoleShape {
    /// Circle of radius `a`
    Circle { a: f64 },
    /// Ellipse with semi-axes `a` (x) and `b` (y)
    Ellipse { a: f64, b: f64 },
    /// Rounded-corner square with half-width `a` (sides facing the axes)
    Square { a: f64 },
}

/// Hole geometry with its mapping coefficients resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleGeometry {
    pub shape: HoleShape,
    /// Mapping scale R
    scale: f64,
    /// Laurent coefficients (k, m_k), k >= 1, zeros omitted
    coeffs: Vec<(u32, f64)>,
}

impl HoleGeometry {
    pub fn new(shape: HoleShape) -> Self {
        let (scale, coeffs) = match shape {
            HoleShape::Circle { a } => (a, Vec::new()),
            HoleShape::Ellipse { a, b } => {
                let scale = (a + b) / 2.0;
                let m1 = (a - b) / (a + b);
                if m1 == 0.0 {
                    (scale, Vec::new())
                } else {
                    (scale, vec![(1, m1)])
                }
            }
            HoleShape::Square { a } => (a / (1.0 + SQUARE_M3), vec![(3, SQUARE_M3)]),
        };
        Self {
            shape,
            scale,
            coeffs,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Non-zero Laurent coefficients (k, m_k)
    pub fn coeffs(&self) -> &[(u32, f64)] {
        &self.coeffs
    }

    /// Mode indices the boundary-condition series must cover
    pub fn mode_set(&self) -> Vec<u32> {
        let mut modes = vec![1];
        for &(k, _) in &self.coeffs {
            if !modes.contains(&k) {
                modes.push(k);
            }
        }
        modes.sort_unstable();
        modes
    }

    /// Physical contour point for parametric angle `theta` (degrees)
    pub fn point(&self, theta_deg: f64) -> (f64, f64) {
        let t = theta_deg.to_radians();
        let mut x = t.cos();
        let mut y = t.sin();
        for &(k, m) in &self.coeffs {
            x += m * (k as f64 * t).cos();
            y -= m * (k as f64 * t).sin();
        }
        (self.scale * x, self.scale * y)
    }

    /// Physical contour angle for parametric angle `theta` (both degrees).
    ///
    /// Quadrant-corrected arctangent of the mapped direction, wrapped into
    /// the revolution matching `theta`.
    pub fn alpha_deg(&self, theta_deg: f64) -> f64 {
        let t = theta_deg.to_radians();
        let mut num = t.sin();
        let mut den = t.cos();
        for &(k, m) in &self.coeffs {
            let kf = k as f64;
            num -= kf * m * (kf * t).sin();
            den += kf * m * (kf * t).cos();
        }
        let mut alpha = num.atan2(den).to_degrees();
        if alpha < 0.0 {
            alpha += 360.0;
        }
        // atan2 wraps at 360; keep alpha continuous with theta at the seam
        if theta_deg >= 270.0 && alpha < 90.0 {
            alpha += 360.0;
        } else if theta_deg <= 90.0 && alpha > 270.0 {
            alpha -= 360.0;
        }
        alpha
    }
}
