//! Real-coefficient polynomial root finding
//!
//! Degrees one and two are handled in closed form. Higher degrees go through
//! Bairstow's method: a real quadratic factor x^2 + u*x + v is refined with a
//! Newton-style correction on (u, v) until the division remainder vanishes,
//! its two roots are emitted, and the deflated polynomial is processed the
//! same way. All arithmetic stays real until the final quadratic solve, so
//! complex-conjugate root pairs come out adjacent in the result.

use crate::error::{CltError, CltResult};
use num_complex::Complex64;

/// Absolute remainder tolerance for accepting a quadratic factor.
const TOLERANCE: f64 = 1e-6;

/// Iteration cap per extracted quadratic factor.
const MAX_ITERATIONS: usize = 500;

/// Nudge applied to degenerate divisors in the correction step.
const EPS_NUDGE: f64 = 1e-12;

/// Roots of a2*x^2 + a1*x + a0.
///
/// Returns the pair with the positive-imaginary (or larger real) member
/// first, its conjugate partner second.
pub fn solve_quadratic(a2: f64, a1: f64, a0: f64) -> CltResult<[Complex64; 2]> {
    if a2 == 0.0 {
        return Err(CltError::InvalidInput(
            "quadratic with zero leading coefficient".to_string(),
        ));
    }
    let disc = a1 * a1 - 4.0 * a2 * a0;
    let den = 2.0 * a2;
    if disc >= 0.0 {
        let sq = disc.sqrt();
        Ok([
            Complex64::new((-a1 + sq) / den, 0.0),
            Complex64::new((-a1 - sq) / den, 0.0),
        ])
    } else {
        let sq = (-disc).sqrt();
        Ok([
            Complex64::new(-a1 / den, sq / den.abs()),
            Complex64::new(-a1 / den, -sq / den.abs()),
        ])
    }
}

/// All roots of a real-coefficient polynomial.
///
/// `coeffs` holds a0..an in ascending powers. Exactly `degree` roots are
/// returned, conjugate pairs adjacent. Ordering beyond pair adjacency is not
/// guaranteed; callers needing a particular physical branch must re-derive
/// the association themselves.
pub fn roots(coeffs: &[f64]) -> CltResult<Vec<Complex64>> {
    // Strip vanishing leading coefficients so deflation stays well posed.
    let mut n = coeffs.len();
    while n > 0 && coeffs[n - 1] == 0.0 {
        n -= 1;
    }
    if n < 2 {
        return Err(CltError::InvalidInput(
            "polynomial must have degree >= 1".to_string(),
        ));
    }
    let degree = n - 1;

    match degree {
        1 => Ok(vec![Complex64::new(-coeffs[0] / coeffs[1], 0.0)]),
        2 => Ok(solve_quadratic(coeffs[2], coeffs[1], coeffs[0]).map(|r| r.to_vec())?),
        _ => bairstow(&coeffs[..n]),
    }
}

/// Bairstow deflation for degree > 2.
fn bairstow(coeffs: &[f64]) -> CltResult<Vec<Complex64>> {
    // Work on descending coefficients, normalized to a monic polynomial.
    let mut d: Vec<f64> = coeffs.iter().rev().copied().collect();
    let lead = d[0];
    for c in &mut d {
        *c /= lead;
    }

    let mut found = Vec::with_capacity(coeffs.len() - 1);

    while d.len() > 3 {
        let n = d.len() - 1;

        // Initial factor guess from the trailing coefficients.
        let mut u = if d[n - 1] != 0.0 { d[n] / d[n - 1] } else { 1.0 };
        let mut v = if d[n - 2] != 0.0 { d[n - 1] / d[n - 2] } else { 1.0 };

        let mut b = vec![0.0; n + 1];
        let mut c = vec![0.0; n + 1];
        let mut converged = false;

        for _ in 0..MAX_ITERATIONS {
            // Synthetic division by x^2 + u*x + v.
            b[0] = d[0];
            b[1] = d[1] - u * b[0];
            for i in 2..=n {
                b[i] = d[i] - u * b[i - 1] - v * b[i - 2];
            }
            // Second division for the Jacobian of the remainder.
            c[0] = b[0];
            c[1] = b[1] - u * c[0];
            for i in 2..n {
                c[i] = b[i] - u * c[i - 1] - v * c[i - 2];
            }

            if b[n - 1].abs() <= TOLERANCE && b[n].abs() <= TOLERANCE {
                converged = true;
                break;
            }

            let mut det = c[n - 2] * c[n - 2] - c[n - 3] * (c[n - 1] - b[n - 1]);
            if det.abs() < EPS_NUDGE {
                det += EPS_NUDGE;
            }
            let du = (b[n - 1] * c[n - 2] - b[n] * c[n - 3]) / det;
            let dv = (b[n] * c[n - 2] - b[n - 1] * (c[n - 1] - b[n - 1])) / det;
            u += du;
            v += dv;
        }

        if !converged {
            return Err(CltError::ConvergenceFailed(MAX_ITERATIONS));
        }

        found.extend_from_slice(&solve_quadratic(1.0, u, v)?);

        // Deflate: the quotient coefficients are b[0..=n-2].
        d = b[..=n - 2].to_vec();
    }

    // Closed form for the remaining degree 1 or 2 tail.
    if d.len() == 3 {
        found.extend_from_slice(&solve_quadratic(d[0], d[1], d[2])?);
    } else {
        found.push(Complex64::new(-d[1] / d[0], 0.0));
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_contains_root(roots: &[Complex64], re: f64, im: f64) {
        let hit = roots
            .iter()
            .any(|r| (r.re - re).abs() < 1e-6 && (r.im - im).abs() < 1e-6);
        assert!(hit, "expected root {re}+{im}i in {roots:?}");
    }

    #[test]
    fn test_quadratic_complex_pair() {
        // x^2 + 1 = 0 -> +-i, positive imaginary first
        let r = solve_quadratic(1.0, 0.0, 1.0).unwrap();
        assert_relative_eq!(r[0].im, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[1].im, -1.0, epsilon = 1e-12);
        assert_relative_eq!(r[0].re, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadratic_real_pair() {
        // x^2 - 3x + 2 = 0 -> 2, 1
        let r = solve_quadratic(1.0, -3.0, 2.0).unwrap();
        assert_relative_eq!(r[0].re, 2.0, epsilon = 1e-12);
        assert_relative_eq!(r[1].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quartic_unit_roots() {
        // x^4 - 1 = 0 -> +-1, +-i
        let r = roots(&[-1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(r.len(), 4);
        assert_contains_root(&r, 1.0, 0.0);
        assert_contains_root(&r, -1.0, 0.0);
        assert_contains_root(&r, 0.0, 1.0);
        assert_contains_root(&r, 0.0, -1.0);
    }

    #[test]
    fn test_conjugate_pairs_adjacent() {
        // (x^2 + 4)(x^2 + 2x + 10): roots +-2i, -1 +- 3i
        let coeffs = [40.0, 8.0, 14.0, 2.0, 1.0];
        let r = roots(&coeffs).unwrap();
        assert_eq!(r.len(), 4);
        for pair in r.chunks(2) {
            assert_relative_eq!(pair[0].re, pair[1].re, epsilon = 1e-5);
            assert_relative_eq!(pair[0].im, -pair[1].im, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_repeated_conjugate_pairs() {
        // (x^2 + 1)^2: the isotropic-laminate degeneracy shape
        let coeffs = [1.0, 0.0, 2.0, 0.0, 1.0];
        let r = roots(&coeffs).unwrap();
        assert_eq!(r.len(), 4);
        for root in &r {
            assert_relative_eq!(root.re, 0.0, epsilon = 1e-3);
            assert_relative_eq!(root.im.abs(), 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_cubic_with_real_root() {
        // (x - 1)(x^2 + 1)
        let coeffs = [-1.0, 1.0, -1.0, 1.0];
        let r = roots(&coeffs).unwrap();
        assert_eq!(r.len(), 3);
        assert_contains_root(&r, 1.0, 0.0);
        assert_contains_root(&r, 0.0, 1.0);
        assert_contains_root(&r, 0.0, -1.0);
    }
}
