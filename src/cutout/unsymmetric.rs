//! Hole loading quantities for unsymmetric laminates
//!
//! Membrane-bending coupling makes all six resultants depend on four
//! potential functions, one per root of a degree-8 characteristic
//! polynomial. The polynomial is the solvability determinant of the coupled
//! equilibrium system: three auxiliary A-polynomials, two B-polynomials and
//! one D-polynomial in the root variable, convolved symbolically.

use crate::cutout::geometry::HoleGeometry;
use crate::cutout::potentials::{ModeCoeff, PlaneMap};
use crate::error::{CltError, CltResult};
use crate::laminate::stack::Laminate;
use crate::math::complex::checked_div;
use crate::math::{lu_solve, poly, C64};
use log::debug;
use nalgebra::{DMatrix, DVector};

const ROOT_DEGENERACY_TOL: f64 = 1e-3;
const ROOT_NUDGE: f64 = 1e-4;

/// Polynomial product on ascending coefficient arrays
fn pmul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Polynomial difference a - b on ascending coefficient arrays
fn psub(a: &[f64], b: &[f64]) -> Vec<f64> {
    let n = a.len().max(b.len());
    let mut out = vec![0.0; n];
    for (i, &x) in a.iter().enumerate() {
        out[i] += x;
    }
    for (i, &y) in b.iter().enumerate() {
        out[i] -= y;
    }
    out
}

/// Horner evaluation at a complex argument
fn peval(p: &[f64], s: C64) -> C64 {
    let mut acc = C64::new(0.0, 0.0);
    for &c in p.iter().rev() {
        acc = acc * s + c;
    }
    acc
}

/// Hole quantities of an unsymmetric (coupled) laminate
#[derive(Debug, Clone)]
pub struct UnsymmetricQuantities {
    /// The four representative roots, sorted by descending |Re|
    pub roots: [C64; 4],
    /// Displacement ratios per root
    pub p: [C64; 4],
    pub q: [C64; 4],
    /// Resultant coefficients per root: [c, d, e, f, g, h] mapping the
    /// potential curvature to [Nx, Ny, Nxy, Mx, My, Mxy]
    pub coef: [[C64; 6]; 4],
    /// Remote-field potential constants
    pub gamma: [C64; 4],
    pub planes: [PlaneMap; 4],
    /// Correction-series coefficients per Laurent mode (4 planes each)
    pub modes: Vec<ModeCoeff>,
}

impl UnsymmetricQuantities {
    /// Build the coupled hole quantities for the full remote resultant
    /// vector [Nx, Ny, Nxy, Mx, My, Mxy].
    pub fn new(laminate: &Laminate, geom: &HoleGeometry, loads: [f64; 6]) -> CltResult<Self> {
        let a = laminate.a_matrix();
        let b = laminate.b_matrix();
        let d = laminate.d_matrix();

        // Auxiliary polynomials of the coupled equilibrium system.
        // Membrane rows (A entries):
        let f1 = [a[(0, 0)], 2.0 * a[(0, 2)], a[(2, 2)]];
        let f2 = [a[(0, 2)], a[(0, 1)] + a[(2, 2)], a[(1, 2)]];
        let f4 = [a[(2, 2)], 2.0 * a[(1, 2)], a[(1, 1)]];
        // Coupling rows (B entries):
        let f3 = [
            b[(0, 0)],
            3.0 * b[(0, 2)],
            b[(0, 1)] + 2.0 * b[(2, 2)],
            b[(1, 2)],
        ];
        let f5 = [
            b[(0, 2)],
            b[(0, 1)] + 2.0 * b[(2, 2)],
            3.0 * b[(1, 2)],
            b[(1, 1)],
        ];
        // Bending row (D entries):
        let f6 = [
            d[(0, 0)],
            4.0 * d[(0, 2)],
            2.0 * (d[(0, 1)] + 2.0 * d[(2, 2)]),
            4.0 * d[(1, 2)],
            d[(1, 1)],
        ];

        // Solvability determinant of [[F1 F2 F3], [F2 F4 F5], [F3 F5 F6]],
        // a degree-8 polynomial with nine coefficients.
        let det = psub(
            &psub(
                &pmul(&f1, &psub(&pmul(&f4, &f6), &pmul(&f5, &f5))),
                &pmul(&f2, &psub(&pmul(&f2, &f6), &pmul(&f5, &f3))),
            ),
            &pmul(&f3, &psub(&pmul(&f4, &f3), &pmul(&f2, &f5))),
        );
        debug_assert_eq!(det.len(), 9);

        // Normalize by the largest-magnitude coefficient before root finding
        let scale = det.iter().fold(0.0f64, |m, &c| m.max(c.abs()));
        if scale == 0.0 {
            return Err(CltError::SingularMatrix("unsymmetric characteristic"));
        }
        let det: Vec<f64> = det.iter().map(|&c| c / scale).collect();

        let all_roots = poly::roots(&det)?;
        let mut roots = [
            all_roots[0],
            all_roots[2],
            all_roots[4],
            all_roots[6],
        ];
        for s in &roots {
            if s.im == 0.0 {
                return Err(CltError::InvalidInput(
                    "characteristic roots must be complex".to_string(),
                ));
            }
        }
        // Stabilizing order for the boundary system: descending |Re|, the
        // smallest-real-part root last. Part of the source formulas, do not
        // rearrange (see DESIGN.md).
        roots.sort_by(|x, y| {
            y.re.abs()
                .partial_cmp(&x.re.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        // Separate near-coincident representatives
        for i in 1..4 {
            for j in 0..i {
                if (roots[i] - roots[j]).norm()
                    < ROOT_DEGENERACY_TOL * (roots[i].norm() + roots[j].norm())
                {
                    roots[i] = roots[j] * (1.0 + ROOT_NUDGE * (i as f64));
                    debug!("degenerate coupled roots, nudged root {i}");
                }
            }
        }

        // Displacement ratios from the first two equilibrium rows
        let mut p = [C64::new(0.0, 0.0); 4];
        let mut q = [C64::new(0.0, 0.0); 4];
        for (j, &s) in roots.iter().enumerate() {
            let (e1, e2, e3) = (peval(&f1, s), peval(&f2, s), peval(&f3, s));
            let (e4, e5) = (peval(&f4, s), peval(&f5, s));
            let den = e1 * e4 - e2 * e2;
            p[j] = checked_div(e3 * e4 - e2 * e5, den)?;
            q[j] = checked_div(e1 * e5 - e2 * e3, den)?;
        }

        // Resultant coefficients: ABD * [p, q*s, p*s + q, -1, -s^2, -2s]
        let abd = laminate.abd();
        let mut coef = [[C64::new(0.0, 0.0); 6]; 4];
        for j in 0..4 {
            let s = roots[j];
            let v = [
                p[j],
                q[j] * s,
                p[j] * s + q[j],
                C64::new(-1.0, 0.0),
                -s * s,
                -2.0 * s,
            ];
            for r in 0..6 {
                let mut acc = C64::new(0.0, 0.0);
                for (cidx, vc) in v.iter().enumerate() {
                    acc += *vc * abd[(r, cidx)];
                }
                coef[j][r] = acc;
            }
        }

        // Remote constants: 2 Re[sum_j coef_rj * Gamma_j] = loads_r, with
        // Im(Gamma_1) = Im(Gamma_2) = 0 closing the 6x6 real system.
        let mut m = DMatrix::<f64>::zeros(6, 6);
        for r in 0..6 {
            m[(r, 0)] = 2.0 * coef[0][r].re;
            m[(r, 1)] = 2.0 * coef[1][r].re;
            m[(r, 2)] = 2.0 * coef[2][r].re;
            m[(r, 3)] = -2.0 * coef[2][r].im;
            m[(r, 4)] = 2.0 * coef[3][r].re;
            m[(r, 5)] = -2.0 * coef[3][r].im;
        }
        let rhs = DVector::from_row_slice(&loads);
        let sol = lu_solve(&m, &rhs)?;
        let gamma = [
            C64::new(sol[0], 0.0),
            C64::new(sol[1], 0.0),
            C64::new(sol[2], sol[3]),
            C64::new(sol[4], sol[5]),
        ];

        let planes = [
            PlaneMap::new(geom, roots[0]),
            PlaneMap::new(geom, roots[1]),
            PlaneMap::new(geom, roots[2]),
            PlaneMap::new(geom, roots[3]),
        ];

        let modes = first_stage_modes(geom, &planes, &roots, &coef, &gamma)?;

        Ok(Self {
            roots,
            p,
            q,
            coef,
            gamma,
            planes,
            modes,
        })
    }
}

/// First-stage potential coefficients, one 7x7 real solve per Laurent mode.
///
/// The traction-free hole gives three complex resultant conditions (in-plane
/// force pair and the transverse-force function, weights e_j, d_j and
/// t_j = h_j + s_j*g_j) plus one compatibility row from the s-weighted
/// transverse condition; the fourth coefficient's imaginary part is fixed to
/// zero.
fn first_stage_modes(
    geom: &HoleGeometry,
    planes: &[PlaneMap; 4],
    roots: &[C64; 4],
    coef: &[[C64; 6]; 4],
    gamma: &[C64; 4],
) -> CltResult<Vec<ModeCoeff>> {
    // Condition weights per plane
    let mut w_e = [C64::new(0.0, 0.0); 4];
    let mut w_d = [C64::new(0.0, 0.0); 4];
    let mut w_t = [C64::new(0.0, 0.0); 4];
    let mut w_st = [C64::new(0.0, 0.0); 4];
    for j in 0..4 {
        w_e[j] = coef[j][2];
        w_d[j] = coef[j][1];
        w_t[j] = coef[j][5] + roots[j] * coef[j][4];
        w_st[j] = roots[j] * w_t[j];
    }

    let mut modes = Vec::new();
    for k in geom.mode_set() {
        // Remote boundary content of each condition at this mode
        let rhs_of = |w: &[C64; 4]| -> C64 {
            let mut r = C64::new(0.0, 0.0);
            for j in 0..4 {
                let term_minus = w[j] * gamma[j] * planes[j].coeff_minus(k);
                let term_plus = w[j] * gamma[j] * planes[j].coeff_plus(k);
                r -= term_minus + term_plus.conj();
            }
            r
        };
        let (r_e, r_d, r_t, r_st) = (rhs_of(&w_e), rhs_of(&w_d), rhs_of(&w_t), rhs_of(&w_st));

        // Unknowns: Re/Im of A_1..A_3, Re of A_4 (Im pinned to zero)
        let mut m = DMatrix::<f64>::zeros(7, 7);
        let mut rhs = DVector::<f64>::zeros(7);
        let conditions = [(w_e, r_e), (w_d, r_d), (w_t, r_t)];
        for (ci, (w, r)) in conditions.into_iter().enumerate() {
            let (re_row, im_row) = (2 * ci, 2 * ci + 1);
            for j in 0..3 {
                m[(re_row, 2 * j)] = w[j].re;
                m[(re_row, 2 * j + 1)] = -w[j].im;
                m[(im_row, 2 * j)] = w[j].im;
                m[(im_row, 2 * j + 1)] = w[j].re;
            }
            m[(re_row, 6)] = w[3].re;
            m[(im_row, 6)] = w[3].im;
            rhs[re_row] = r.re;
            rhs[im_row] = r.im;
        }
        // Compatibility row: real part of the s-weighted condition
        for j in 0..3 {
            m[(6, 2 * j)] = w_st[j].re;
            m[(6, 2 * j + 1)] = -w_st[j].im;
        }
        m[(6, 6)] = w_st[3].re;
        rhs[6] = r_st.re;

        let sol = lu_solve(&m, &rhs)?;
        let a = vec![
            C64::new(sol[0], sol[1]),
            C64::new(sol[2], sol[3]),
            C64::new(sol[4], sol[5]),
            C64::new(sol[6], 0.0),
        ];
        modes.push(ModeCoeff { k, a });
    }
    Ok(modes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutout::geometry::HoleShape;
    use crate::laminate::material::Material;
    use approx::assert_relative_eq;

    fn unsymmetric_laminate() -> Laminate {
        Laminate::from_angles(&Material::cfrp(), &[0.0, 90.0], 0.125).unwrap()
    }

    #[test]
    fn test_poly_helpers() {
        // (1 + x)(1 - x) = 1 - x^2
        let prod = pmul(&[1.0, 1.0], &[1.0, -1.0]);
        assert_eq!(prod, vec![1.0, 0.0, -1.0]);
        let diff = psub(&[1.0, 2.0, 3.0], &[1.0, 1.0]);
        assert_eq!(diff, vec![0.0, 1.0, 3.0]);
        let v = peval(&[1.0, 0.0, 1.0], C64::new(0.0, 1.0));
        assert_relative_eq!(v.norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_characteristic_degree_eight() {
        let lam = unsymmetric_laminate();
        let geom = HoleGeometry::new(HoleShape::Circle { a: 1.0 });
        let q = UnsymmetricQuantities::new(&lam, &geom, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        // Four representative roots, all complex
        for s in &q.roots {
            assert!(s.im != 0.0);
        }
        // Sorted by descending |Re|
        for w in q.roots.windows(2) {
            assert!(w[0].re.abs() >= w[1].re.abs() - 1e-12);
        }
    }

    #[test]
    fn test_equilibrium_identities() {
        // c + s*e = 0 and e + s*d = 0 hold by construction of p, q;
        // f + 2*s*h + s^2*g = 0 holds because s is a characteristic root.
        let lam = unsymmetric_laminate();
        let geom = HoleGeometry::new(HoleShape::Circle { a: 1.0 });
        let q = UnsymmetricQuantities::new(&lam, &geom, [1.0, 0.0, 0.0, 0.5, 0.0, 0.0]).unwrap();
        for j in 0..4 {
            let s = q.roots[j];
            let [c, d, e, f, g, h] = q.coef[j];
            let scale = c.norm().max(f.norm()).max(1.0);
            assert!((c + s * e).norm() < 1e-8 * scale);
            assert!((e + s * d).norm() < 1e-8 * scale);
            assert!((f + 2.0 * s * h + s * s * g).norm() < 1e-2 * scale);
        }
    }

    #[test]
    fn test_remote_constants_reproduce_loads() {
        let lam = unsymmetric_laminate();
        let geom = HoleGeometry::new(HoleShape::Circle { a: 1.0 });
        let loads = [3.0, -1.0, 0.5, 0.2, 0.8, -0.3];
        let q = UnsymmetricQuantities::new(&lam, &geom, loads).unwrap();
        for r in 0..6 {
            let mut acc = 0.0;
            for j in 0..4 {
                acc += 2.0 * (q.coef[j][r] * q.gamma[j]).re;
            }
            assert_relative_eq!(acc, loads[r], epsilon = 1e-6 * (1.0 + loads[r].abs()));
        }
    }

    #[test]
    fn test_zero_load_zero_correction() {
        let lam = unsymmetric_laminate();
        let geom = HoleGeometry::new(HoleShape::Circle { a: 1.0 });
        let q = UnsymmetricQuantities::new(&lam, &geom, [0.0; 6]).unwrap();
        for mode in &q.modes {
            for a in &mode.a {
                assert_relative_eq!(a.norm(), 0.0, epsilon = 1e-9);
            }
        }
    }
}
