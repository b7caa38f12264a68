//! Complex arithmetic helpers on top of `num_complex`
//!
//! The root-finding and potential-evaluation code works with `Complex64`
//! throughout. The helpers here add the pieces the solvers need beyond the
//! operator impls: division that rejects a zero divisor instead of producing
//! NaN, integer powers with negative exponents, and the magnitude ordering
//! used to keep conjugate pairs adjacent.

use crate::error::{CltError, CltResult};
use num_complex::Complex64;
use std::cmp::Ordering;

/// Complex division with an explicit error on a (0, 0) divisor.
///
/// `num_complex` happily divides by zero and propagates NaN; downstream the
/// NaN would silently poison every boundary stress, so the solvers route all
/// divisions with data-dependent divisors through this check.
pub fn checked_div(num: Complex64, den: Complex64) -> CltResult<Complex64> {
    if den.re == 0.0 && den.im == 0.0 {
        return Err(CltError::ComplexDivisionByZero);
    }
    Ok(num / den)
}

/// Integer power supporting negative exponents.
///
/// For n < 0 the reciprocal is formed via the conjugate over the squared
/// magnitude, then iterated, so a zero base with a negative exponent is
/// rejected instead of returning infinities.
pub fn powi(z: Complex64, n: i32) -> CltResult<Complex64> {
    if n >= 0 {
        return Ok(z.powu(n as u32));
    }
    let norm_sq = z.norm_sqr();
    if norm_sq == 0.0 {
        return Err(CltError::ComplexDivisionByZero);
    }
    let recip = z.conj() / norm_sq;
    Ok(recip.powu((-n) as u32))
}

/// Ordering by |re| descending, then |im| descending.
///
/// Sorting roots with this comparator places the two members of a conjugate
/// pair next to each other; callers then take the first of each pair.
pub fn magnitude_order(a: &Complex64, b: &Complex64) -> Ordering {
    match b.re.abs().partial_cmp(&a.re.abs()) {
        Some(Ordering::Equal) | None => b
            .im
            .abs()
            .partial_cmp(&a.im.abs())
            .unwrap_or(Ordering::Equal),
        Some(ord) => ord,
    }
}
