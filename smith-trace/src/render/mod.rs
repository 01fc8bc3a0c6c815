//! Text rendering of a decomposition trace.
//!
//! Produces the classic indented log: one `| ` per nesting level, every operation
//! followed by a snapshot of the matrix, and an indented blank line after each step.

use std::fmt::Write;

use itertools::Itertools;

use crate::errors::SmithError;
use crate::matrix::{DEFAULT_CELL_WIDTH, Matrix};
use crate::smith::{Decomposition, Step};

/// Accumulates rendered steps.
#[derive(Debug, Clone)]
pub struct TraceWriter {
    width: usize,
    level: usize,
    output: String,
}

impl Default for TraceWriter {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_WIDTH)
    }
}

impl TraceWriter {
    /// `width` is the cell width used for matrix snapshots.
    pub fn new(width: usize) -> Self {
        TraceWriter {
            width,
            level: 0,
            output: String::new(),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Renders one step. `matrix` must be the state right after the step was pulled.
    pub fn push(&mut self, step: &Step, matrix: &Matrix) {
        if let Some(description) = step.description() {
            self.line(description);
        }
        if let Some(op) = step.op() {
            self.line(&op.to_string());
            self.line(&format!("{:width$}", matrix, width = self.width));
        }

        self.level = self.level.saturating_add_signed(step.indent().delta() as isize);
        self.line("");
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn finish(self) -> String {
        self.output
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", indent(text, self.level));
    }
}

/// Prefixes every line of `text` with `level` copies of `| `.
pub fn indent(text: &str, level: usize) -> String {
    let prefix = "| ".repeat(level);
    text.split('\n').map(|line| format!("{prefix}{line}")).join("\n")
}

/// Runs a full decomposition of `matrix` and renders every step.
///
/// # Errors
///
/// Stops at the first error of the stream.
pub fn render_trace(matrix: &mut Matrix, width: usize) -> Result<String, SmithError> {
    let mut writer = TraceWriter::new(width);
    let mut run = Decomposition::new(matrix);
    while let Some(step) = run.next() {
        writer.push(&step?, run.matrix());
    }
    Ok(writer.finish())
}
