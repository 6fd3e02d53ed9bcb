//! # The Hungarian method
//!
//! Solves the assignment problem on a square cost matrix by reducing it until an assignment of
//! zero reduced cost exists. Zeros are marked as starred (tentatively assigned) or primed
//! (candidates for an augmenting path), as in Munkres' description of the method.
//!
//! Every step performs the work of a single `Phase`.
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::{EPSILON, Progress, SolveError, Stepwise};
use crate::data::assignment::AssignmentProblem;
use crate::data::linear_algebra::matrix::DenseMatrix;

/// Mark on a zero of the reduced cost matrix.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Mark {
    Starred,
    Primed,
}

/// The work done by the next step.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Subtract the row minimum from every row.
    ReduceRows,
    /// Subtract the column minimum from every column.
    ReduceColumns,
    /// Star independent zeros and cover their columns.
    CoverZeros,
    /// Read the assignment from the starred zeros.
    FindAssignment,
    /// Prime an uncovered zero, or shift the matrix values if there is none.
    AdjustMatrix,
    #[allow(missing_docs)]
    Complete,
}

/// Row `row` is assigned to column `column`.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub row: usize,
    pub column: usize,
}

/// Snapshot of the Hungarian method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HungarianState {
    /// The balanced, square problem.
    problem: AssignmentProblem,
    /// Reduced costs; for maximization derived from `max - cost`.
    cost_matrix: DenseMatrix,
    /// Costs of the balanced problem before any conversion.
    original: DenseMatrix,
    assignments: Vec<Assignment>,
    total_cost: f64,
    step: usize,
    status: Progress,
    explanation: String,
    covered_rows: Vec<bool>,
    covered_columns: Vec<bool>,
    marks: Vec<Vec<Option<Mark>>>,
    /// Value subtracted in the last matrix adjustment.
    min_uncovered: Option<f64>,
    phase: Phase,
}

/// Set up the Hungarian method.
///
/// The problem is padded to a square matrix. A maximization problem is converted to the
/// minimization of `max - cost`, which has the same optimal assignments.
///
/// # Errors
///
/// If the cost matrix is empty or ragged, see `AssignmentProblem::validate`.
pub fn initialize(problem: &AssignmentProblem) -> Result<HungarianState, SolveError> {
    problem.validate()?;
    let balanced = problem.balance();
    let n = balanced.nr_rows();

    let original = DenseMatrix::from_data(balanced.costs.clone());
    let cost_matrix = if balanced.is_maximization {
        let maximum = original.maximum().unwrap_or(0_f64);
        original.map(|cost| maximum - cost)
    } else {
        original.clone()
    };
    debug!("Initialized {}x{} assignment problem", n, n);

    Ok(HungarianState {
        explanation: format!(
            "Starting Hungarian Method for {} assignment problem.",
            if balanced.is_maximization { "maximization" } else { "minimization" },
        ),
        problem: balanced,
        cost_matrix,
        original,
        assignments: Vec::new(),
        total_cost: 0_f64,
        step: 0,
        status: Progress::Initial,
        covered_rows: vec![false; n],
        covered_columns: vec![false; n],
        marks: vec![vec![None; n]; n],
        min_uncovered: None,
        phase: Phase::ReduceRows,
    })
}

fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

impl HungarianState {
    fn reduce_rows(&mut self) {
        for i in 0..self.n() {
            if let Some(minimum) = self.cost_matrix.row_minimum(i) {
                self.cost_matrix.add_to_row(i, -minimum);
            }
        }
        self.phase = Phase::ReduceColumns;
        self.explanation = "Subtracted the smallest element of each row from that row.".to_string();
    }

    fn reduce_columns(&mut self) {
        for j in 0..self.n() {
            if let Some(minimum) = self.cost_matrix.column_minimum(j) {
                self.cost_matrix.add_to_column(j, -minimum);
            }
        }
        self.phase = Phase::CoverZeros;
        self.explanation = "Subtracted the smallest element of each column from that column.".to_string();
    }

    /// Star zeros greedily, row by row, so that no two share a row or column.
    fn cover_zeros(&mut self) {
        let n = self.n();
        for i in 0..n {
            for j in 0..n {
                if is_zero(self.cost_matrix[(i, j)])
                    && self.marks[i][j].is_none()
                    && self.starred_in_row(i).is_none()
                    && self.starred_in_column(j).is_none() {
                    self.marks[i][j] = Some(Mark::Starred);
                }
            }
        }

        let covered = self.cover_starred_columns();
        self.phase = if covered == n { Phase::FindAssignment } else { Phase::AdjustMatrix };
        self.explanation = format!(
            "Starred independent zeros and covered their columns: {} of {} lines needed.",
            covered, n,
        );
    }

    /// Cover exactly the columns containing a starred zero.
    ///
    /// # Return value
    ///
    /// Number of covered columns.
    fn cover_starred_columns(&mut self) -> usize {
        let n = self.n();
        self.covered_rows = vec![false; n];
        self.covered_columns = (0..n).map(|j| self.starred_in_column(j).is_some()).collect();

        self.covered_columns.iter().filter(|&&covered| covered).count()
    }

    fn adjust_matrix(&mut self) {
        match self.uncovered_zero() {
            Some((i, j)) => {
                self.marks[i][j] = Some(Mark::Primed);
                match self.starred_in_row(i) {
                    Some(starred_column) => {
                        self.covered_rows[i] = true;
                        self.covered_columns[starred_column] = false;
                        self.explanation = format!(
                            "Primed zero at ({}, {}). Its row has a starred zero: covered row {}, uncovered column {}.",
                            i + 1, j + 1, i + 1, starred_column + 1,
                        );
                    },
                    None => {
                        let length = self.augment(i, j);
                        let covered = self.cover_starred_columns();
                        if covered == self.n() {
                            self.phase = Phase::FindAssignment;
                        }
                        self.explanation = format!(
                            "Primed zero at ({}, {}) has no starred zero in its row. Flipped the augmenting path of {} zeros; {} of {} columns covered.",
                            i + 1, j + 1, length, covered, self.n(),
                        );
                    },
                }
            },
            None => {
                let minimum = self.min_uncovered_value();
                let n = self.n();
                for i in 0..n {
                    for j in 0..n {
                        match (self.covered_rows[i], self.covered_columns[j]) {
                            (false, false) => self.cost_matrix[(i, j)] -= minimum,
                            (true, true) => self.cost_matrix[(i, j)] += minimum,
                            _ => {},
                        }
                    }
                }
                self.min_uncovered = Some(minimum);
                self.explanation = format!(
                    "No uncovered zeros. Subtracted the minimum uncovered value {} from uncovered elements and added it to doubly covered elements.",
                    minimum,
                );
            },
        }
        trace!("Reduced costs:\n{}", self.cost_matrix);
    }

    /// Alternate between primed and starred zeros, starting at the primed zero `(row, column)`,
    /// then star the primes and unstar the stars on the path. All other primes are erased.
    ///
    /// # Return value
    ///
    /// Length of the path.
    fn augment(&mut self, row: usize, column: usize) -> usize {
        let mut path = vec![(row, column)];
        let mut current_column = column;
        while let Some(starred_row) = self.starred_in_column(current_column) {
            path.push((starred_row, current_column));
            // Rows reached through a starred zero always hold a prime
            match self.primed_in_row(starred_row) {
                Some(primed_column) => {
                    path.push((starred_row, primed_column));
                    current_column = primed_column;
                },
                None => break,
            }
        }

        for &(i, j) in &path {
            self.marks[i][j] = match self.marks[i][j] {
                Some(Mark::Starred) => None,
                _ => Some(Mark::Starred),
            };
        }
        for mark in self.marks.iter_mut().flatten() {
            if *mark == Some(Mark::Primed) {
                *mark = None;
            }
        }
        debug!("Augmenting path {:?}", path);

        path.len()
    }

    fn find_assignment(&mut self) {
        let n = self.n();
        self.assignments = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.marks[i][j] == Some(Mark::Starred))
            .map(|(row, column)| Assignment { row, column })
            .collect();
        self.total_cost = self.assignments.iter()
            .map(|assignment| self.original[(assignment.row, assignment.column)])
            .sum();
        self.phase = Phase::Complete;
        self.status = Progress::Complete;
        self.explanation = format!("Optimal assignment found with total cost {}.", self.total_cost);
        debug!("Assignment complete with total cost {}", self.total_cost);
    }

    /// First uncovered zero in row major order.
    fn uncovered_zero(&self) -> Option<(usize, usize)> {
        let n = self.n();
        (0..n)
            .filter(|&i| !self.covered_rows[i])
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .find(|&(i, j)| !self.covered_columns[j] && is_zero(self.cost_matrix[(i, j)]))
    }

    fn min_uncovered_value(&self) -> f64 {
        let n = self.n();
        (0..n)
            .filter(|&i| !self.covered_rows[i])
            .flat_map(|i| (0..n).filter(|&j| !self.covered_columns[j]).map(move |j| (i, j)))
            .map(|(i, j)| self.cost_matrix[(i, j)])
            .reduce(f64::min)
            .unwrap_or(0_f64)
    }

    fn starred_in_row(&self, row: usize) -> Option<usize> {
        self.marks[row].iter().position(|&mark| mark == Some(Mark::Starred))
    }

    fn starred_in_column(&self, column: usize) -> Option<usize> {
        self.marks.iter().position(|row| row[column] == Some(Mark::Starred))
    }

    fn primed_in_row(&self, row: usize) -> Option<usize> {
        self.marks[row].iter().position(|&mark| mark == Some(Mark::Primed))
    }

    /// Dimension of the square matrix.
    fn n(&self) -> usize {
        self.marks.len()
    }

    /// The balanced problem.
    pub fn problem(&self) -> &AssignmentProblem {
        &self.problem
    }
    /// The current reduced costs.
    pub fn cost_matrix(&self) -> &DenseMatrix {
        &self.cost_matrix
    }
    /// Costs of the balanced problem, as given.
    pub fn original(&self) -> &DenseMatrix {
        &self.original
    }
    /// Empty until the method is complete.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }
    /// Sum of the original costs of the assignment.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
    /// Number of steps taken.
    pub fn step_count(&self) -> usize {
        self.step
    }
    #[allow(missing_docs)]
    pub fn status(&self) -> Progress {
        self.status
    }
    /// What happened in the step that produced this state.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
    #[allow(missing_docs)]
    pub fn covered_rows(&self) -> &[bool] {
        &self.covered_rows
    }
    #[allow(missing_docs)]
    pub fn covered_columns(&self) -> &[bool] {
        &self.covered_columns
    }
    /// Mark of the zero at `(row, column)`, if any.
    pub fn mark(&self, row: usize, column: usize) -> Option<Mark> {
        self.marks[row][column]
    }
    #[allow(missing_docs)]
    pub fn min_uncovered(&self) -> Option<f64> {
        self.min_uncovered
    }
    #[allow(missing_docs)]
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl Stepwise for HungarianState {
    fn step(&self) -> Result<Self, SolveError> {
        if self.status == Progress::Complete {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        next.step += 1;
        next.status = Progress::Running;
        match self.phase {
            Phase::ReduceRows => next.reduce_rows(),
            Phase::ReduceColumns => next.reduce_columns(),
            Phase::CoverZeros => next.cover_zeros(),
            Phase::AdjustMatrix => next.adjust_matrix(),
            Phase::FindAssignment => next.find_assignment(),
            Phase::Complete => next.status = Progress::Complete,
        }
        debug!("Hungarian step {}: {:?} -> {:?}", next.step, self.phase, next.phase);

        Ok(next)
    }

    fn is_terminal(&self) -> bool {
        self.status == Progress::Complete
    }
}
