//! Exact integer arithmetic used by the reduction.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::Matrix;
use crate::errors::SmithError;

/// Euclidean division: returns `(q, r)` with `a = q*b + r` and `0 <= r < |b|`.
///
/// The remainder is never negative, whatever the signs of `a` and `b`.
///
/// # Errors
///
/// Returns `SmithError::DivisionByZero` if `b` is 0.
///
/// # Example
///
/// ```
/// # use num_bigint::BigInt;
/// # use smith_trace::matrix::divide;
/// let (q, r) = divide(&BigInt::from(-7), &BigInt::from(2)).unwrap();
/// assert_eq!((q, r), (BigInt::from(-4), BigInt::from(1)));
///
/// let (q, r) = divide(&BigInt::from(7), &BigInt::from(-2)).unwrap();
/// assert_eq!((q, r), (BigInt::from(-3), BigInt::from(1)));
/// ```
pub fn divide(a: &BigInt, b: &BigInt) -> Result<(BigInt, BigInt), SmithError> {
    if b.is_zero() {
        return Err(SmithError::DivisionByZero);
    }

    let r = a.mod_floor(&b.abs());
    // a - r is an exact multiple of b
    let q = (a - &r) / b;

    Ok((q, r))
}

/// Returns `true` if `d` divides `a`. Zero divides only zero.
pub fn divides(d: &BigInt, a: &BigInt) -> bool {
    if d.is_zero() {
        return a.is_zero();
    }

    a.is_multiple_of(d)
}

/// Determinant of a square matrix, computed with fraction-free (Bareiss) elimination so
/// every intermediate value stays an integer.
///
/// # Errors
///
/// Returns `SmithError::DimensionMismatch` if the matrix is not square.
pub fn determinant(matrix: &Matrix) -> Result<BigInt, SmithError> {
    let n = matrix.rows();
    if matrix.cols() != n {
        return Err(SmithError::DimensionMismatch(format!(
            "Determinant needs a square matrix, got {}x{}",
            n,
            matrix.cols()
        )));
    }

    let mut a = matrix.to_rows();
    let mut negate = false;
    let mut prev = BigInt::one();

    for k in 0..n - 1 {
        if a[k][k].is_zero() {
            let Some(swap) = (k + 1..n).find(|&i| !a[i][k].is_zero()) else {
                return Ok(BigInt::zero());
            };
            a.swap(k, swap);
            negate = !negate;
        }

        for i in k + 1..n {
            for j in k + 1..n {
                let value = (&a[i][j] * &a[k][k] - &a[i][k] * &a[k][j]) / &prev;
                a[i][j] = value;
            }
        }
        prev = a[k][k].clone();
    }

    let det = a[n - 1][n - 1].clone();
    if negate { Ok(-det) } else { Ok(det) }
}
