//! The six reduction stages, written as resumable tasks.
//!
//! The engine keeps a stack of [`Task`]s. Resuming a task does a bounded amount of work:
//! it queues the steps of one loop iteration and pushes whatever has to run next, so
//! nested stages (stage 4 re-running stages 2–3, stage 6 re-running 2–5) flatten into a
//! single ordered stream. A task is only resumed once every queued step has been handed
//! out, so it always reads the matrix with all earlier operations applied.

use itertools::iproduct;
use log::debug;
use num_traits::Zero;

use super::Decomposition;
use super::step::Step;
use crate::errors::SmithError;
use crate::matrix::{ElementaryOp, divide, divides, find_pivot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Task {
    Enter(String),
    Exit,
    /// Stage 1 for `top`, then schedules stages 2–6.
    Frontier { top: usize },
    CloseFrontier { top: usize },
    /// Stage 2 for every column right of the pivot, then stage 3.
    PurgeRow { top: usize },
    RowDivisible { top: usize, col: usize },
    RowPurge { top: usize },
    /// Stage 4 sweeps until the pivot column is divisible, then stage 5.
    PurgeCol { top: usize },
    ColSweep { top: usize },
    ColDivisible { top: usize, row: usize },
    ColPurge { top: usize },
    /// Stage 6 sweeps until the whole open submatrix is divisible.
    SubmatrixSweep { top: usize },
    EntryDivisible { top: usize, row: usize, col: usize },
    SubmatrixSettle { top: usize },
}

impl Decomposition<'_> {
    pub(super) fn resume(&mut self, task: Task) -> Result<(), SmithError> {
        match task {
            Task::Enter(description) => self.emit(Step::enter(description)),
            Task::Exit => self.emit(Step::exit()),
            Task::Frontier { top } => self.acquire_pivot(top)?,
            Task::CloseFrontier { top } => {
                self.emit(Step::exit());
                self.tasks.push(Task::Frontier { top: top + 1 });
            }
            Task::PurgeRow { top } => {
                self.tasks.push(Task::RowPurge { top });
                for col in (top + 1..self.matrix.cols()).rev() {
                    self.scoped(
                        format!("2: making ({top}, {col}) divisible by ({top}, {top})"),
                        Task::RowDivisible { top, col },
                    );
                }
            }
            Task::RowDivisible { top, col } => self.make_row_entry_divisible(top, col)?,
            Task::RowPurge { top } => self.purge_row(top)?,
            Task::PurgeCol { top } => {
                self.tasks.push(Task::ColPurge { top });
                self.tasks.push(Task::ColSweep { top });
            }
            Task::ColSweep { top } => {
                for row in (top + 1..self.matrix.rows()).rev() {
                    self.scoped(
                        format!("4: making ({row}, {top}) divisible by ({top}, {top})"),
                        Task::ColDivisible { top, row },
                    );
                }
            }
            Task::ColDivisible { top, row } => self.make_col_entry_divisible(top, row)?,
            Task::ColPurge { top } => self.purge_col(top)?,
            Task::SubmatrixSweep { top } => {
                let entries: Vec<(usize, usize)> =
                    iproduct!(top + 1..self.matrix.rows(), top + 1..self.matrix.cols()).collect();
                for (row, col) in entries.into_iter().rev() {
                    self.scoped(
                        format!("6: making ({row}, {col}) divisible by ({top}, {top})"),
                        Task::EntryDivisible { top, row, col },
                    );
                }
            }
            Task::EntryDivisible { top, row, col } => self.make_entry_divisible(top, row, col)?,
            Task::SubmatrixSettle { top } => {
                if !self.submatrix_divisible(top) {
                    debug!("frontier {}: pivot shrank during stage 6, sweeping again", top);
                    self.tasks.push(Task::SubmatrixSettle { top });
                    self.tasks.push(Task::SubmatrixSweep { top });
                }
            }
        }
        Ok(())
    }

    /// Runs `task` between an opening marker and its closing marker.
    fn scoped(&mut self, description: String, task: Task) {
        self.tasks.push(Task::Exit);
        self.tasks.push(task);
        self.tasks.push(Task::Enter(description));
    }

    /// Stage 1: move the first nonzero entry of the open submatrix to `(top, top)`.
    fn acquire_pivot(&mut self, top: usize) -> Result<(), SmithError> {
        if top >= self.matrix.rows().min(self.matrix.cols()) {
            return Ok(());
        }
        self.top = top;
        self.emit(Step::enter(format!("Top left entry ({top}, {top})")));

        let Some((row, col)) = find_pivot(&*self.matrix, top) else {
            debug!("frontier {}: open submatrix is zero", top);
            self.emit(Step::note("1: all zero, done"));
            self.emit(Step::exit());
            self.tasks.clear();
            return Ok(());
        };
        debug!("frontier {}: pivot found at ({}, {})", top, row, col);

        self.emit(Step::enter(format!("1: ensuring ({top}, {top}) is non-zero")));
        if row != top {
            self.emit_op("1", ElementaryOp::RowSwap { first: top, second: row });
        }
        if col != top {
            self.emit_op("1", ElementaryOp::ColSwap { first: top, second: col });
        }
        self.emit(Step::exit());

        self.tasks.extend([
            Task::CloseFrontier { top },
            Task::SubmatrixSettle { top },
            Task::SubmatrixSweep { top },
            Task::PurgeCol { top },
            Task::PurgeRow { top },
        ]);
        Ok(())
    }

    /// Stage 2, one iteration: the pivot and `(top, col)` take a Euclidean step.
    fn make_row_entry_divisible(&mut self, top: usize, col: usize) -> Result<(), SmithError> {
        let pivot = &self.matrix[(top, top)];
        let entry = &self.matrix[(top, col)];
        if divides(pivot, entry) {
            return Ok(());
        }

        let (q, _) = divide(entry, pivot)?;
        self.tasks.push(Task::RowDivisible { top, col });
        self.emit_op("2.1", ElementaryOp::col_add(top, -q, col)?);
        self.emit_op("2.2", ElementaryOp::ColSwap { first: top, second: col });
        Ok(())
    }

    /// Stage 3: clear the pivot row, every entry being a multiple of the pivot.
    fn purge_row(&mut self, top: usize) -> Result<(), SmithError> {
        self.emit(Step::enter(format!("3: purging row {top}")));
        let pivot = self.matrix[(top, top)].clone();
        for col in top + 1..self.matrix.cols() {
            let (q, r) = divide(&self.matrix[(top, col)], &pivot)?;
            if !r.is_zero() {
                return Err(SmithError::BrokenInvariant(format!(
                    "({top}, {col}) is not a multiple of the pivot after stage 2"
                )));
            }
            if !q.is_zero() {
                self.emit_op("3", ElementaryOp::col_add(top, -q, col)?);
            }
        }
        self.emit(Step::exit());
        Ok(())
    }

    /// Stage 4, one iteration. A row swap replaces the pivot, so stages 2–3 run again
    /// before the entry is looked at a second time.
    fn make_col_entry_divisible(&mut self, top: usize, row: usize) -> Result<(), SmithError> {
        let pivot = &self.matrix[(top, top)];
        let entry = &self.matrix[(row, top)];
        if divides(pivot, entry) {
            return Ok(());
        }

        let (q, _) = divide(entry, pivot)?;
        self.tasks.push(Task::ColDivisible { top, row });
        self.tasks.push(Task::PurgeRow { top });
        self.emit_op("4.1", ElementaryOp::row_add(top, -q, row)?);
        self.emit_op("4.2", ElementaryOp::RowSwap { first: top, second: row });
        Ok(())
    }

    /// Stage 5: clear the pivot column. If the pivot shrank during the stage 4 sweep an
    /// earlier row may no longer be a multiple of it; sweep again in that case.
    fn purge_col(&mut self, top: usize) -> Result<(), SmithError> {
        let pivot = self.matrix[(top, top)].clone();
        let rows = self.matrix.rows();
        if (top + 1..rows).any(|row| !divides(&pivot, &self.matrix[(row, top)])) {
            debug!("frontier {}: pivot shrank during stage 4, sweeping again", top);
            self.tasks.push(Task::ColPurge { top });
            self.tasks.push(Task::ColSweep { top });
            return Ok(());
        }

        self.emit(Step::enter(format!("5: purging col {top}")));
        for row in top + 1..rows {
            let (q, _) = divide(&self.matrix[(row, top)], &pivot)?;
            if !q.is_zero() {
                self.emit_op("5", ElementaryOp::row_add(top, -q, row)?);
            }
        }
        self.emit(Step::exit());
        Ok(())
    }

    /// Stage 6, one iteration. Folds `(row, col)` into the pivot row and column so the
    /// remainder becomes the new, strictly smaller pivot, then re-purges.
    fn make_entry_divisible(&mut self, top: usize, row: usize, col: usize) -> Result<(), SmithError> {
        let pivot = &self.matrix[(top, top)];
        let entry = &self.matrix[(row, col)];
        if divides(pivot, entry) {
            return Ok(());
        }

        // value of (row, col) once 6.1 has added column `top` into column `col`
        let shifted = entry + &self.matrix[(row, top)];
        let (q, _) = divide(&shifted, pivot)?;

        self.tasks.push(Task::EntryDivisible { top, row, col });
        self.tasks.push(Task::PurgeCol { top });
        self.tasks.push(Task::PurgeRow { top });
        self.emit_op("6.1", ElementaryOp::col_add(top, 1, col)?);
        self.emit_op("6.2", ElementaryOp::row_add(top, -q, row)?);
        self.emit_op("6.3", ElementaryOp::ColSwap { first: top, second: col });
        self.emit_op("6.4", ElementaryOp::RowSwap { first: top, second: row });
        Ok(())
    }

    fn submatrix_divisible(&self, top: usize) -> bool {
        let pivot = &self.matrix[(top, top)];
        iproduct!(top + 1..self.matrix.rows(), top + 1..self.matrix.cols())
            .all(|(i, j)| divides(pivot, &self.matrix[(i, j)]))
    }

    fn emit(&mut self, step: Step) {
        self.pending.push_back(step);
    }

    fn emit_op(&mut self, description: &str, op: ElementaryOp) {
        self.pending.push_back(Step::operation(description, op));
    }
}
