//! # Smith Trace
//!
//! Smith normal form of integer matrices by elementary row and column operations, with a
//! complete, replayable trace of every operation applied.

pub mod errors;
pub mod matrix;
pub mod render;
pub mod smith;

pub use errors::SmithError;
pub use matrix::{ElementaryOp, Matrix};
pub use smith::{Decomposition, Step, Trace, decompose, replay};
