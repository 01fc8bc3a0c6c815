//! The four elementary unimodular operations.
//!
//! Every operation has determinant ±1, so applying one never changes the lattice spanned
//! by the rows or columns of the matrix.

use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use super::Matrix;
use super::codec::big_int;
use crate::errors::{Axis, SmithError};

/// Discriminant of an [`ElementaryOp`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    RowSwap,
    ColSwap,
    RowAdd,
    ColAdd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ElementaryOp {
    /// Exchange two rows.
    RowSwap { first: usize, second: usize },
    /// Exchange two columns.
    ColSwap { first: usize, second: usize },
    /// `row[dst] += mult * row[src]`.
    RowAdd {
        src: usize,
        #[serde(with = "big_int")]
        mult: BigInt,
        dst: usize,
    },
    /// `col[dst] += mult * col[src]`.
    ColAdd {
        src: usize,
        #[serde(with = "big_int")]
        mult: BigInt,
        dst: usize,
    },
}

impl ElementaryOp {
    /// Builds a `RowAdd`, refusing `src == dst`.
    ///
    /// # Errors
    ///
    /// Returns `SmithError::SelfAddition` if both rows are the same: scaling a row by
    /// `1 + mult` is not unimodular in general.
    pub fn row_add(src: usize, mult: impl Into<BigInt>, dst: usize) -> Result<Self, SmithError> {
        if src == dst {
            return Err(SmithError::SelfAddition(Axis::Row, src));
        }
        Ok(ElementaryOp::RowAdd {
            src,
            mult: mult.into(),
            dst,
        })
    }

    /// Builds a `ColAdd`, refusing `src == dst`.
    pub fn col_add(src: usize, mult: impl Into<BigInt>, dst: usize) -> Result<Self, SmithError> {
        if src == dst {
            return Err(SmithError::SelfAddition(Axis::Col, src));
        }
        Ok(ElementaryOp::ColAdd {
            src,
            mult: mult.into(),
            dst,
        })
    }

    pub fn kind(&self) -> OpKind {
        match self {
            ElementaryOp::RowSwap { .. } => OpKind::RowSwap,
            ElementaryOp::ColSwap { .. } => OpKind::ColSwap,
            ElementaryOp::RowAdd { .. } => OpKind::RowAdd,
            ElementaryOp::ColAdd { .. } => OpKind::ColAdd,
        }
    }

    /// Which side of the matrix the operation touches.
    pub fn axis(&self) -> Axis {
        match self {
            ElementaryOp::RowSwap { .. } | ElementaryOp::RowAdd { .. } => Axis::Row,
            ElementaryOp::ColSwap { .. } | ElementaryOp::ColAdd { .. } => Axis::Col,
        }
    }

    /// The operation that undoes this one. Swaps are their own inverse.
    ///
    /// # Example
    ///
    /// ```
    /// # use smith_trace::matrix::ElementaryOp;
    /// let op = ElementaryOp::row_add(0, 3, 1).unwrap();
    /// assert_eq!(op.inverse(), ElementaryOp::row_add(0, -3, 1).unwrap());
    /// ```
    pub fn inverse(&self) -> Self {
        match self {
            ElementaryOp::RowSwap { .. } | ElementaryOp::ColSwap { .. } => self.clone(),
            ElementaryOp::RowAdd { src, mult, dst } => ElementaryOp::RowAdd {
                src: *src,
                mult: -mult,
                dst: *dst,
            },
            ElementaryOp::ColAdd { src, mult, dst } => ElementaryOp::ColAdd {
                src: *src,
                mult: -mult,
                dst: *dst,
            },
        }
    }

    /// Determinant of the operation's elementary matrix: -1 for a swap of two distinct
    /// lines, +1 otherwise.
    pub fn determinant(&self) -> i8 {
        match self {
            ElementaryOp::RowSwap { first, second } | ElementaryOp::ColSwap { first, second } => {
                if first == second { 1 } else { -1 }
            }
            ElementaryOp::RowAdd { .. } | ElementaryOp::ColAdd { .. } => 1,
        }
    }

    /// Applies the operation to `matrix` in place.
    ///
    /// # Errors
    ///
    /// Returns `SmithError::IndexOutOfBounds` if an index does not exist in `matrix`, or
    /// `SmithError::SelfAddition` for an add with `src == dst`. The matrix is left
    /// untouched in both cases.
    pub fn apply(&self, matrix: &mut Matrix) -> Result<(), SmithError> {
        match self {
            ElementaryOp::RowSwap { first, second } => {
                check_index(Axis::Row, *first, matrix.rows())?;
                check_index(Axis::Row, *second, matrix.rows())?;
                matrix.swap_rows(*first, *second);
            }
            ElementaryOp::ColSwap { first, second } => {
                check_index(Axis::Col, *first, matrix.cols())?;
                check_index(Axis::Col, *second, matrix.cols())?;
                matrix.swap_cols(*first, *second);
            }
            ElementaryOp::RowAdd { src, mult, dst } => {
                check_index(Axis::Row, *src, matrix.rows())?;
                check_index(Axis::Row, *dst, matrix.rows())?;
                if src == dst {
                    return Err(SmithError::SelfAddition(Axis::Row, *src));
                }
                matrix.add_row_multiple(*src, mult, *dst);
            }
            ElementaryOp::ColAdd { src, mult, dst } => {
                check_index(Axis::Col, *src, matrix.cols())?;
                check_index(Axis::Col, *dst, matrix.cols())?;
                if src == dst {
                    return Err(SmithError::SelfAddition(Axis::Col, *src));
                }
                matrix.add_col_multiple(*src, mult, *dst);
            }
        }
        Ok(())
    }
}

fn check_index(axis: Axis, index: usize, len: usize) -> Result<(), SmithError> {
    if index >= len {
        return Err(SmithError::IndexOutOfBounds { axis, index, len });
    }
    Ok(())
}

impl fmt::Display for ElementaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementaryOp::RowSwap { first, second } => write!(f, "Swap rows {}, {}", first, second),
            ElementaryOp::ColSwap { first, second } => write!(f, "Swap cols {}, {}", first, second),
            ElementaryOp::RowAdd { src, mult, dst } => {
                write!(f, "Add {} times row {} to row {}", mult, src, dst)
            }
            ElementaryOp::ColAdd { src, mult, dst } => {
                write!(f, "Add {} times col {} to col {}", mult, src, dst)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::try_from(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 10]]).unwrap()
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            ElementaryOp::RowSwap { first: 0, second: 2 }.to_string(),
            "Swap rows 0, 2"
        );
        assert_eq!(
            ElementaryOp::ColSwap { first: 1, second: 0 }.to_string(),
            "Swap cols 1, 0"
        );
        assert_eq!(
            ElementaryOp::row_add(0, -3, 1).unwrap().to_string(),
            "Add -3 times row 0 to row 1"
        );
        assert_eq!(
            ElementaryOp::col_add(2, 5, 0).unwrap().to_string(),
            "Add 5 times col 2 to col 0"
        );
    }

    #[test]
    fn test_kind_and_axis() -> Result<(), SmithError> {
        let cases = [
            (ElementaryOp::RowSwap { first: 0, second: 1 }, OpKind::RowSwap, Axis::Row),
            (ElementaryOp::ColSwap { first: 2, second: 0 }, OpKind::ColSwap, Axis::Col),
            (ElementaryOp::row_add(1, 4, 2)?, OpKind::RowAdd, Axis::Row),
            (ElementaryOp::col_add(0, -1, 1)?, OpKind::ColAdd, Axis::Col),
        ];
        for (op, kind, axis) in cases {
            assert_eq!(op.kind(), kind, "{}", op);
            assert_eq!(op.axis(), axis, "{}", op);
            assert_eq!(op.inverse().kind(), kind);
        }
        Ok(())
    }

    #[test]
    fn test_apply_each_kind() -> Result<(), SmithError> {
        let mut m = sample();
        ElementaryOp::RowSwap { first: 0, second: 1 }.apply(&mut m)?;
        assert_eq!(m, Matrix::try_from(vec![vec![4, 5, 6], vec![1, 2, 3], vec![7, 8, 10]])?);

        ElementaryOp::ColSwap { first: 0, second: 2 }.apply(&mut m)?;
        assert_eq!(m, Matrix::try_from(vec![vec![6, 5, 4], vec![3, 2, 1], vec![10, 8, 7]])?);

        ElementaryOp::row_add(1, -2, 0)?.apply(&mut m)?;
        assert_eq!(m, Matrix::try_from(vec![vec![0, 1, 2], vec![3, 2, 1], vec![10, 8, 7]])?);

        ElementaryOp::col_add(2, 1, 1)?.apply(&mut m)?;
        assert_eq!(m, Matrix::try_from(vec![vec![0, 3, 2], vec![3, 3, 1], vec![10, 15, 7]])?);
        Ok(())
    }

    #[test]
    fn test_inverse_restores_matrix() -> Result<(), SmithError> {
        let ops = vec![
            ElementaryOp::RowSwap { first: 0, second: 2 },
            ElementaryOp::ColSwap { first: 1, second: 2 },
            ElementaryOp::row_add(2, 7, 0)?,
            ElementaryOp::col_add(0, -4, 1)?,
        ];
        for op in ops {
            let mut m = sample();
            op.apply(&mut m)?;
            assert_ne!(m, sample(), "{} should change the matrix", op);
            op.inverse().apply(&mut m)?;
            assert_eq!(m, sample(), "{} then its inverse", op);
        }
        Ok(())
    }

    #[test]
    fn test_self_addition_is_rejected() {
        assert!(matches!(
            ElementaryOp::row_add(1, 2, 1),
            Err(SmithError::SelfAddition(Axis::Row, 1))
        ));
        assert!(ElementaryOp::col_add(0, 1, 0).is_err());

        // constructed directly, bypassing the checked constructor
        let op = ElementaryOp::ColAdd {
            src: 2,
            mult: BigInt::from(1),
            dst: 2,
        };
        let mut m = sample();
        assert!(op.apply(&mut m).is_err());
        assert_eq!(m, sample());
    }

    #[test]
    fn test_out_of_bounds_leaves_matrix_untouched() {
        let mut m = sample();
        let err = ElementaryOp::RowSwap { first: 0, second: 3 }.apply(&mut m);
        assert!(matches!(
            err,
            Err(SmithError::IndexOutOfBounds {
                axis: Axis::Row,
                index: 3,
                len: 3
            })
        ));
        assert!(ElementaryOp::col_add(5, 1, 0).unwrap().apply(&mut m).is_err());
        assert_eq!(m, sample());
    }

    #[test]
    fn test_determinant_of_operations() -> Result<(), SmithError> {
        let m = sample();
        let det = m.determinant()?;
        let ops = vec![
            ElementaryOp::RowSwap { first: 0, second: 1 },
            ElementaryOp::RowSwap { first: 1, second: 1 },
            ElementaryOp::ColSwap { first: 0, second: 2 },
            ElementaryOp::row_add(0, 9, 2)?,
            ElementaryOp::col_add(1, -5, 0)?,
        ];
        for op in ops {
            let mut changed = m.clone();
            op.apply(&mut changed)?;
            assert_eq!(changed.determinant()?, &det * BigInt::from(op.determinant()), "{}", op);
        }
        Ok(())
    }

    #[test]
    fn test_serde_shape() -> Result<(), SmithError> {
        let op = ElementaryOp::col_add(0, -2, 1)?;
        let text = serde_json::to_string(&op)?;
        assert_eq!(text, r#"{"kind":"ColAdd","src":0,"mult":-2,"dst":1}"#);
        let back: ElementaryOp = serde_json::from_str(&text)?;
        assert_eq!(back, op);
        Ok(())
    }
}
