//! Small dense linear algebra used by the constitutive and cut-out solvers
//!
//! The 3x3 inverse is the closed-form adjugate (used on the A and D blocks).
//! Symmetric positive definite systems (the full ABD) go through Cholesky so
//! a structurally invalid laminate fails loudly instead of producing garbage.
//! Once the exchange operator has swapped load/strain roles the matrix is no
//! longer symmetric and must be solved with the LU path.

use crate::error::{CltError, CltResult};
use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, Vector6};

pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec6 = Vector6<f64>;

/// Closed-form determinant of a 3x3 matrix.
pub fn det3(m: &Mat3) -> f64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Closed-form adjugate inverse of a 3x3 matrix (no pivoting).
pub fn invert3(m: &Mat3) -> CltResult<Mat3> {
    let det = det3(m);
    if det == 0.0 {
        return Err(CltError::SingularMatrix("3x3 inverse"));
    }
    let inv_det = 1.0 / det;
    Ok(Mat3::new(
        (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)]) * inv_det,
        (m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)]) * inv_det,
        (m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)]) * inv_det,
        (m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)]) * inv_det,
        (m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)]) * inv_det,
        (m[(0, 2)] * m[(1, 0)] - m[(0, 0)] * m[(1, 2)]) * inv_det,
        (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)]) * inv_det,
        (m[(0, 1)] * m[(2, 0)] - m[(0, 0)] * m[(2, 1)]) * inv_det,
        (m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]) * inv_det,
    ))
}

/// Inverse of a symmetric positive definite 6x6 matrix via Cholesky.
///
/// The factorization is reused for column-by-column solves against the unit
/// vectors. A non-positive-definite input (negative radicand on a diagonal
/// pivot) reports `NotPositiveDefinite`.
pub fn spd_inverse6(m: &Mat6) -> CltResult<Mat6> {
    let chol = m.cholesky().ok_or(CltError::NotPositiveDefinite)?;
    let mut inv = Mat6::zeros();
    for j in 0..6 {
        let mut e = Vec6::zeros();
        e[j] = 1.0;
        let col = chol.solve(&e);
        inv.set_column(j, &col);
    }
    Ok(inv)
}

/// Direct Cholesky solve of a symmetric positive definite system.
pub fn spd_solve(a: &DMatrix<f64>, b: &DVector<f64>) -> CltResult<DVector<f64>> {
    if a.nrows() != b.len() {
        return Err(CltError::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }
    let chol = a.clone().cholesky().ok_or(CltError::NotPositiveDefinite)?;
    Ok(chol.solve(b))
}

/// LU solve of a (generally unsymmetric) 6x6 system.
pub fn lu_solve6(a: &Mat6, b: &Vec6) -> CltResult<Vec6> {
    a.lu()
        .solve(b)
        .ok_or(CltError::SingularMatrix("6x6 LU solve"))
}

/// LU solve of a general square system.
pub fn lu_solve(a: &DMatrix<f64>, b: &DVector<f64>) -> CltResult<DVector<f64>> {
    if a.nrows() != a.ncols() || a.nrows() != b.len() {
        return Err(CltError::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }
    a.clone()
        .lu()
        .solve(b)
        .ok_or(CltError::SingularMatrix("LU solve"))
}

/// Variable-exchange (pivot substitution) operator on a 6x6 system.
///
/// For y = M*x, each masked index p swaps the roles of y_p and x_p, the
/// classical Bronstein substitution:
///
/// ```text
/// m'[p][p] = 1/m[p][p]
/// m'[p][j] = -m[p][j]/m[p][p]      j != p
/// m'[i][p] =  m[i][p]/m[p][p]      i != p
/// m'[i][j] =  m[i][j] - m[i][p]*m[p][j]/m[p][p]
/// ```
///
/// Applied to the ABD matrix with the "strain prescribed" mask, the exchanged
/// system maps a mixed input vector (strains at masked rows, forces
/// elsewhere) when solved with the LU path; Cholesky no longer applies since
/// the result is not symmetric.
pub fn exchange(m: &Mat6, mask: &[bool; 6]) -> CltResult<Mat6> {
    let mut a = *m;
    for (p, &swap) in mask.iter().enumerate() {
        if !swap {
            continue;
        }
        let pivot = a[(p, p)];
        if pivot == 0.0 {
            return Err(CltError::SingularMatrix("exchange pivot"));
        }
        let mut b = a;
        b[(p, p)] = 1.0 / pivot;
        for j in 0..6 {
            if j == p {
                continue;
            }
            b[(p, j)] = -a[(p, j)] / pivot;
            b[(j, p)] = a[(j, p)] / pivot;
        }
        for i in 0..6 {
            for j in 0..6 {
                if i != p && j != p {
                    b[(i, j)] = a[(i, j)] - a[(i, p)] * a[(p, j)] / pivot;
                }
            }
        }
        a = b;
    }
    Ok(a)
}
