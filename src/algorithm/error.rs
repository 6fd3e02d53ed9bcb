//! # Errors raised by the solvers
//!
//! Reaching an infeasible, unbounded or optimal state is not an error: those are regular solver
//! states. The errors in this module describe input that can't be solved at all, or steps that are
//! requested while their preconditions don't hold.
use std::error::Error;
use std::fmt::{self, Display};

use crate::algorithm::transportation::Cell;

/// Every fault that can occur while initializing or stepping one of the solvers.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The problem description is inconsistent, e.g. dimensions don't match.
    ///
    /// The contained `String` is a message for the end user.
    InvalidProblem(String),
    /// The MODI method can only start from a complete initial solution.
    IncompleteInitialSolution,
    /// The MODI method needs `rows + columns - 1` basic cells to determine all dual variables.
    DegenerateSolution {
        /// Number of cells with a positive allocation.
        basic_cells: usize,
        /// Number of basic cells a nondegenerate solution has.
        expected: usize,
    },
    /// Not all dual variables could be determined from the basic cells.
    UnresolvedDualVariables {
        /// Row indices without a `u` value.
        rows: Vec<usize>,
        /// Column indices without a `v` value.
        columns: Vec<usize>,
    },
    /// No closed loop through the entering cell exists in the set of basic cells.
    NoClosedLoop(Cell),
    /// The minimum ratio test found positive column entries, but none with a nonnegative ratio.
    RatioTestFailed {
        /// Index of the column that was to enter the basis.
        column: usize,
    },
}

impl Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveError::InvalidProblem(message) => write!(f, "Invalid problem: {}", message),
            SolveError::IncompleteInitialSolution => f.write_str(
                "The MODI method requires a complete initial basic feasible solution",
            ),
            SolveError::DegenerateSolution { basic_cells, expected } => write!(
                f,
                "Degenerate solution: {} basic cells where {} are needed to compute the dual variables",
                basic_cells, expected,
            ),
            SolveError::UnresolvedDualVariables { rows, columns } => write!(
                f,
                "Could not determine dual variables for rows {:?} and columns {:?}; the basic cells don't span the problem",
                rows, columns,
            ),
            SolveError::NoClosedLoop(cell) => write!(
                f,
                "Could not find a closed loop through cell ({}, {}); the problem may be degenerate",
                cell.row + 1, cell.column + 1,
            ),
            SolveError::RatioTestFailed { column } => write!(
                f,
                "Minimum ratio test failed for entering column {}: no nonnegative ratio",
                column,
            ),
        }
    }
}

impl Error for SolveError {}
