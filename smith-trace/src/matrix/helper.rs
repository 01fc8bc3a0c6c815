use itertools::iproduct;
use num_bigint::BigInt;
use num_traits::Zero;
use rand::prelude::{Rng, SeedableRng, StdRng};

use super::Matrix;
use crate::errors::SmithError;

/// Finds the first nonzero entry of the open submatrix `[top..rows) × [top..cols)`,
/// scanning row by row.
///
/// Returns `None` when that submatrix is entirely zero (or empty), meaning the
/// decomposition has nothing left to reduce.
///
/// # Example
///
/// ```
/// # use smith_trace::matrix::{Matrix, find_pivot};
/// let m = Matrix::try_from(vec![vec![7, 0, 0], vec![0, 0, 0], vec![0, 0, 3]]).unwrap();
/// assert_eq!(find_pivot(&m, 0), Some((0, 0)));
/// assert_eq!(find_pivot(&m, 1), Some((2, 2)));
/// assert_eq!(find_pivot(&m, 3), None);
/// ```
pub fn find_pivot(matrix: &Matrix, top: usize) -> Option<(usize, usize)> {
    iproduct!(top..matrix.rows(), top..matrix.cols()).find(|&(i, j)| !matrix[(i, j)].is_zero())
}

/// Generates a `rows`×`cols` matrix with entries drawn uniformly from `[-bound, bound]`.
///
/// The generator is seeded, so the same arguments always produce the same matrix.
///
/// # Errors
///
/// Returns `SmithError::InvalidMatrix` if either dimension is 0.
pub fn random_matrix(
    rows: usize,
    cols: usize,
    bound: u32,
    seed: u64,
) -> Result<Matrix, SmithError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let bound = i64::from(bound);

    let data: Vec<Vec<BigInt>> = (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| BigInt::from(rng.random_range(-bound..=bound)))
                .collect()
        })
        .collect();

    Matrix::try_with(data)
}
