//! # Smith Module
//!
//! Reduces an integer matrix to Smith normal form with elementary operations, producing
//! the reduction as a lazy stream of [`Step`]s.
//!
//! ```
//! # use smith_trace::matrix::Matrix;
//! # use smith_trace::smith::Decomposition;
//! let mut matrix = Matrix::try_from(vec![vec![2, 4], vec![6, 8]]).unwrap();
//! let mut run = Decomposition::new(&mut matrix);
//! while let Some(step) = run.next() {
//!     let step = step.unwrap();
//!     if let Some(op) = step.op() {
//!         // the matrix already reflects `op` here
//!         println!("{}\n{}", op, run.matrix());
//!     }
//! }
//! assert!(matrix.is_smith_normal_form());
//! ```

mod stages;
pub mod step;

use std::collections::VecDeque;
use std::iter::FusedIterator;

use log::{debug, trace};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::errors::SmithError;
use crate::matrix::codec::big_ints;
use crate::matrix::{ElementaryOp, Matrix};
use stages::Task;

pub use step::{Indent, Step};

/// A single, pull-driven Smith normal form reduction of one matrix.
///
/// Each call to [`Iterator::next`] advances the algorithm just far enough to hand out one
/// step. An operation step has been applied to the matrix when it is returned, and not
/// before, so [`Decomposition::matrix`] always shows the state right after the last step
/// seen. Dropping the run early leaves the matrix valid but only partially reduced.
///
/// After an error the stream is fused: every later call returns `None`.
pub struct Decomposition<'a> {
    matrix: &'a mut Matrix,
    tasks: Vec<Task>,
    pending: VecDeque<Step>,
    top: usize,
    applied: usize,
    finished: bool,
}

impl<'a> Decomposition<'a> {
    pub fn new(matrix: &'a mut Matrix) -> Self {
        debug!(
            "starting decomposition of a {}x{} matrix",
            matrix.rows(),
            matrix.cols()
        );
        Decomposition {
            matrix,
            tasks: vec![Task::Frontier { top: 0 }],
            pending: VecDeque::new(),
            top: 0,
            applied: 0,
            finished: false,
        }
    }

    /// The matrix as of the last step handed out.
    pub fn matrix(&self) -> &Matrix {
        &*self.matrix
    }

    /// Index of the diagonal entry currently being settled.
    pub fn top(&self) -> usize {
        self.top
    }

    pub fn operations_applied(&self) -> usize {
        self.applied
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn advance(&mut self) -> Result<Option<Step>, SmithError> {
        loop {
            if let Some(step) = self.pending.pop_front() {
                if let Step::Operation { op, .. } = &step {
                    op.apply(self.matrix)?;
                    self.applied += 1;
                    trace!("applied {}", op);
                }
                return Ok(Some(step));
            }

            let Some(task) = self.tasks.pop() else {
                return Ok(None);
            };
            self.resume(task)?;
        }
    }
}

impl Iterator for Decomposition<'_> {
    type Item = Result<Step, SmithError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.advance() {
            Ok(Some(step)) => Some(Ok(step)),
            Ok(None) => {
                self.finished = true;
                debug!("decomposition finished after {} operations", self.applied);
                None
            }
            Err(e) => {
                self.finished = true;
                self.tasks.clear();
                self.pending.clear();
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Decomposition<'_> {}

/// A fully collected decomposition trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub steps: Vec<Step>,
    /// Absolute values of the nonzero diagonal of the reduced matrix.
    #[serde(with = "big_ints")]
    pub invariant_factors: Vec<BigInt>,
}

impl Trace {
    /// The applied operations, in order.
    pub fn operations(&self) -> impl DoubleEndedIterator<Item = &ElementaryOp> {
        self.steps.iter().filter_map(Step::op)
    }

    pub fn operation_count(&self) -> usize {
        self.operations().count()
    }
}

/// Reduces `matrix` to Smith normal form in place and returns the whole trace.
///
/// # Errors
///
/// Returns the first error the stream yields; `matrix` keeps the state it had reached.
pub fn decompose(matrix: &mut Matrix) -> Result<Trace, SmithError> {
    let steps = Decomposition::new(matrix).collect::<Result<Vec<Step>, SmithError>>()?;
    Ok(Trace {
        steps,
        invariant_factors: matrix.invariant_factors(),
    })
}

/// Applies `ops` in order to a copy of `original`.
pub fn replay<'o>(
    original: &Matrix,
    ops: impl IntoIterator<Item = &'o ElementaryOp>,
) -> Result<Matrix, SmithError> {
    let mut matrix = original.clone();
    for op in ops {
        op.apply(&mut matrix)?;
    }
    Ok(matrix)
}
