//! # Assignment problems
//!
//! Assign each row (a worker, say) to exactly one column (a job) such that the total cost is
//! minimal, or the total profit maximal.
use serde::{Deserialize, Serialize};

use crate::algorithm::SolveError;
use crate::data::linear_algebra::matrix::DenseMatrix;

/// An assignment problem as entered by the user.
///
/// The cost matrix may be rectangular. Empty label lists get the default names `R1`, `R2`, ... and
/// `C1`, `C2`, ...
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentProblem {
    /// Cost of assigning each row to each column, one vector per row.
    pub costs: Vec<Vec<f64>>,
    /// Names of the rows.
    #[serde(default)]
    pub row_labels: Vec<String>,
    /// Names of the columns.
    #[serde(default)]
    pub column_labels: Vec<String>,
    /// The costs are profits to maximize.
    #[serde(default)]
    pub is_maximization: bool,
}

impl AssignmentProblem {
    /// Create a minimization problem with default labels.
    pub fn new(costs: Vec<Vec<f64>>) -> Self {
        Self { costs, row_labels: Vec::new(), column_labels: Vec::new(), is_maximization: false }
    }

    /// Check that the cost matrix is a nonempty, finite rectangle and that the labels fit it.
    ///
    /// # Errors
    ///
    /// A `SolveError::InvalidProblem` describing the first problem found.
    pub fn validate(&self) -> Result<(), SolveError> {
        let invalid = |message: String| Err(SolveError::InvalidProblem(message));

        let nr_columns = self.nr_columns();
        if self.nr_rows() == 0 || nr_columns == 0 {
            return invalid("the cost matrix is empty".to_string());
        }
        if let Some(i) = self.costs.iter().position(|row| row.len() != nr_columns) {
            return invalid(format!("cost row {} has {} entries, expected {}", i + 1, self.costs[i].len(), nr_columns));
        }
        if self.costs.iter().flatten().any(|cost| !cost.is_finite()) {
            return invalid("all costs must be finite".to_string());
        }
        if !self.row_labels.is_empty() && self.row_labels.len() != self.nr_rows() {
            return invalid(format!("{} row labels for {} rows", self.row_labels.len(), self.nr_rows()));
        }
        if !self.column_labels.is_empty() && self.column_labels.len() != nr_columns {
            return invalid(format!("{} column labels for {} columns", self.column_labels.len(), nr_columns));
        }

        Ok(())
    }

    /// Pad to a square problem.
    ///
    /// Dummy rows and columns cost zero and are labelled `Dummy-k`, with `k` their 1-based
    /// position.
    pub fn balance(&self) -> Self {
        let n = self.nr_rows().max(self.nr_columns());

        let labels = |given: &[String], prefix: &str, size: usize| (0..n)
            .map(|i| if i < size {
                given.get(i).cloned().unwrap_or_else(|| format!("{}{}", prefix, i + 1))
            } else {
                format!("Dummy-{}", i + 1)
            })
            .collect::<Vec<_>>();

        let mut costs = DenseMatrix::zeros(n, n);
        for (i, row) in self.costs.iter().enumerate() {
            for (j, &cost) in row.iter().enumerate() {
                costs[(i, j)] = cost;
            }
        }

        Self {
            costs: costs.data(),
            row_labels: labels(&self.row_labels, "R", self.nr_rows()),
            column_labels: labels(&self.column_labels, "C", self.nr_columns()),
            is_maximization: self.is_maximization,
        }
    }

    #[allow(missing_docs)]
    pub fn nr_rows(&self) -> usize {
        self.costs.len()
    }

    #[allow(missing_docs)]
    pub fn nr_columns(&self) -> usize {
        self.costs.first().map_or(0, Vec::len)
    }
}
