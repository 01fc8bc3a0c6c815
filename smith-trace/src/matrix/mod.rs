//! # Matrix Module
//!
//! Provides the dense integer [`Matrix`] the decomposition works on, together with the
//! elementary operations that act on it and the arithmetic helpers they rely on.

pub mod codec;
pub mod helper;
pub mod math;
pub mod ops;

use std::fmt;
use std::ops::Index;

use itertools::Itertools;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::errors::SmithError;
use codec::RawEntry;

pub use helper::{find_pivot, random_matrix};
pub use math::{determinant, divide, divides};
pub use ops::{ElementaryOp, OpKind};

/// Cell width used when a matrix is printed without an explicit width.
pub const DEFAULT_CELL_WIDTH: usize = 6;

/// A rectangular integer matrix with at least one row and one column.
///
/// Entries are arbitrary precision, so no sequence of elementary operations can overflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<RawEntry>>", into = "Vec<Vec<RawEntry>>")]
pub struct Matrix {
    data: Vec<Vec<BigInt>>,
}

impl Matrix {
    /// Creates a matrix from its rows.
    ///
    /// # Errors
    ///
    /// Returns `SmithError::InvalidMatrix` if there are no rows, no columns, or the rows
    /// have different lengths.
    pub fn try_with(data: Vec<Vec<BigInt>>) -> Result<Self, SmithError> {
        let Some(first) = data.first() else {
            return Err(SmithError::InvalidMatrix(
                "Matrix must have at least one row".to_string(),
            ));
        };
        let cols = first.len();
        if cols == 0 {
            return Err(SmithError::InvalidMatrix(
                "Matrix must have at least one column".to_string(),
            ));
        }
        for (i, row) in data.iter().enumerate() {
            if row.len() != cols {
                return Err(SmithError::InvalidMatrix(format!(
                    "Row {} has length {} but expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
        }

        Ok(Matrix { data })
    }

    /// Creates an all-zero `rows`×`cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, SmithError> {
        Matrix::try_with(vec![vec![BigInt::zero(); cols]; rows])
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.data[0].len()
    }

    /// Returns the entry at `(row, col)`, or `None` when it lies outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<&BigInt> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    pub fn row(&self, row: usize) -> &[BigInt] {
        &self.data[row]
    }

    /// The main diagonal, `min(rows, cols)` entries long.
    pub fn diagonal(&self) -> Vec<&BigInt> {
        (0..self.rows().min(self.cols()))
            .map(|i| &self.data[i][i])
            .collect()
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().flatten().all(Zero::is_zero)
    }

    pub fn is_diagonal(&self) -> bool {
        self.data
            .iter()
            .enumerate()
            .all(|(i, row)| row.iter().enumerate().all(|(j, v)| i == j || v.is_zero()))
    }

    /// Checks the defining shape of a Smith normal form: the matrix is diagonal and every
    /// diagonal entry divides the next one. Signs are not normalized, so `d` and `-d`
    /// are treated as the same invariant factor.
    ///
    /// # Example
    ///
    /// ```
    /// # use smith_trace::matrix::Matrix;
    /// let snf = Matrix::try_from(vec![vec![2, 0, 0], vec![0, -4, 0]]).unwrap();
    /// assert!(snf.is_smith_normal_form());
    ///
    /// let not_snf = Matrix::try_from(vec![vec![2, 0], vec![0, 3]]).unwrap();
    /// assert!(!not_snf.is_smith_normal_form());
    /// ```
    pub fn is_smith_normal_form(&self) -> bool {
        self.is_diagonal()
            && self
                .diagonal()
                .into_iter()
                .tuple_windows()
                .all(|(d, next)| divides(d, next))
    }

    /// Absolute values of the nonzero diagonal entries, in order.
    ///
    /// Only meaningful once the matrix is in Smith normal form.
    pub fn invariant_factors(&self) -> Vec<BigInt> {
        self.diagonal()
            .into_iter()
            .filter(|d| !d.is_zero())
            .map(Signed::abs)
            .collect()
    }

    /// Determinant of a square matrix, see [`math::determinant`].
    pub fn determinant(&self) -> Result<BigInt, SmithError> {
        determinant(self)
    }

    pub fn to_rows(&self) -> Vec<Vec<BigInt>> {
        self.data.clone()
    }

    pub(crate) fn swap_rows(&mut self, first: usize, second: usize) {
        self.data.swap(first, second);
    }

    pub(crate) fn swap_cols(&mut self, first: usize, second: usize) {
        for row in self.data.iter_mut() {
            row.swap(first, second);
        }
    }

    /// `row[dst] += mult * row[src]`. Caller guarantees `src != dst`.
    pub(crate) fn add_row_multiple(&mut self, src: usize, mult: &BigInt, dst: usize) {
        if mult.is_zero() {
            return;
        }
        for j in 0..self.cols() {
            let delta = mult * &self.data[src][j];
            self.data[dst][j] += delta;
        }
    }

    /// `col[dst] += mult * col[src]`. Caller guarantees `src != dst`.
    pub(crate) fn add_col_multiple(&mut self, src: usize, mult: &BigInt, dst: usize) {
        if mult.is_zero() {
            return;
        }
        for row in self.data.iter_mut() {
            let delta = mult * &row[src];
            row[dst] += delta;
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = BigInt;

    fn index(&self, (row, col): (usize, usize)) -> &BigInt {
        &self.data[row][col]
    }
}

impl TryFrom<Vec<Vec<i64>>> for Matrix {
    type Error = SmithError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        Matrix::try_with(
            rows.into_iter()
                .map(|row| row.into_iter().map(BigInt::from).collect())
                .collect(),
        )
    }
}

/// Prints the matrix as nested brackets with every entry right-aligned to the formatter
/// width (default [`DEFAULT_CELL_WIDTH`]):
///
/// ```text
/// [ [     2,      4 ],
///   [     6,      8 ] ]
/// ```
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = f.width().unwrap_or(DEFAULT_CELL_WIDTH);
        for (i, row) in self.data.iter().enumerate() {
            if i == 0 {
                f.write_str("[ ")?;
            } else {
                f.write_str(",\n  ")?;
            }
            let cells = row
                .iter()
                .map(|v| format!("{:>width$}", v.to_string(), width = width))
                .join(", ");
            write!(f, "[{} ]", cells)?;
        }
        f.write_str(" ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<i64>>) -> Matrix {
        Matrix::try_from(rows).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_ragged() {
        assert!(Matrix::try_with(Vec::new()).is_err());
        assert!(Matrix::try_from(vec![Vec::<i64>::new()]).is_err());
        assert!(Matrix::try_from(vec![vec![1, 2], vec![3]]).is_err());
        assert!(Matrix::zeros(0, 3).is_err());
    }

    #[test]
    fn test_shape_and_access() {
        let m = matrix(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m[(1, 2)], BigInt::from(6));
        assert_eq!(m.get(1, 0), Some(&BigInt::from(4)));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(1), &[BigInt::from(4), BigInt::from(5), BigInt::from(6)][..]);
        assert_eq!(m.diagonal(), vec![&BigInt::from(1), &BigInt::from(5)]);
    }

    #[test]
    fn test_zero_and_diagonal_predicates() {
        assert!(Matrix::zeros(2, 3).unwrap().is_zero());
        assert!(matrix(vec![vec![3, 0], vec![0, 0], vec![0, 0]]).is_diagonal());
        assert!(!matrix(vec![vec![3, 1], vec![0, 0]]).is_diagonal());
    }

    #[test]
    fn test_smith_normal_form_predicate() {
        assert!(matrix(vec![vec![1, 0], vec![0, 0]]).is_smith_normal_form());
        assert!(matrix(vec![vec![-3, 0], vec![0, 6]]).is_smith_normal_form());
        // A zero diagonal entry may only be followed by zeros.
        assert!(!matrix(vec![vec![0, 0], vec![0, 5]]).is_smith_normal_form());
        assert!(!matrix(vec![vec![1, 1], vec![0, 1]]).is_smith_normal_form());
    }

    #[test]
    fn test_invariant_factors_drop_sign_and_zeros() {
        let m = matrix(vec![vec![2, 0, 0], vec![0, -4, 0], vec![0, 0, 0]]);
        assert_eq!(m.invariant_factors(), vec![BigInt::from(2), BigInt::from(4)]);
    }

    #[test]
    fn test_row_and_col_primitives() {
        let mut m = matrix(vec![vec![1, 2], vec![3, 4]]);
        m.swap_rows(0, 1);
        assert_eq!(m, matrix(vec![vec![3, 4], vec![1, 2]]));
        m.swap_cols(0, 1);
        assert_eq!(m, matrix(vec![vec![4, 3], vec![2, 1]]));
        m.add_row_multiple(1, &BigInt::from(-2), 0);
        assert_eq!(m, matrix(vec![vec![0, 1], vec![2, 1]]));
        m.add_col_multiple(0, &BigInt::from(3), 1);
        assert_eq!(m, matrix(vec![vec![0, 1], vec![2, 7]]));
    }

    #[test]
    fn test_display_pads_entries() {
        let m = matrix(vec![vec![2, 4], vec![6, -8]]);
        assert_eq!(
            m.to_string(),
            "[ [     2,      4 ],\n  [     6,     -8 ] ]"
        );
        assert_eq!(format!("{:3}", m), "[ [  2,   4 ],\n  [  6,  -8 ] ]");
    }

    #[test]
    fn test_json_round_trip_keeps_big_entries() -> Result<(), SmithError> {
        let m: Matrix = serde_json::from_str(r#"[[1, "123456789012345678901234567890"], [-3, 0]]"#)?;
        assert_eq!(
            m[(0, 1)],
            "123456789012345678901234567890".parse::<BigInt>().unwrap()
        );
        let text = serde_json::to_string(&m)?;
        assert_eq!(text, r#"[[1,"123456789012345678901234567890"],[-3,0]]"#);
        Ok(())
    }

    #[test]
    fn test_json_rejects_ragged_rows() {
        let parsed: Result<Matrix, _> = serde_json::from_str("[[1, 2], [3]]");
        assert!(parsed.is_err());
    }
}
