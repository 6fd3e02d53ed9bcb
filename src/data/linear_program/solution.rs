//! # Representation of solutions
//!
//! Once the simplex method reaches a terminal state, the tableau is read back into a solution
//! report for the user.
use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

use crate::data::number_types::big_m::MNumber;

/// Represents a full solution to a linear program.
///
/// Contains the value of every decision, slack and surplus variable.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Value of the objective function for this solution.
    objective_value: MNumber,
    /// (variable name, solution value) tuples, in column order.
    solution_values: Vec<(String, f64)>,
}

impl Solution {
    /// Create a new `Solution` instance.
    ///
    /// # Arguments
    ///
    /// * `objective_value`: Value `Z` of the objective function.
    /// * `solution_values`: Value of each variable, named as in the tableau.
    pub fn new(objective_value: MNumber, solution_values: Vec<(String, f64)>) -> Self {
        Self { objective_value, solution_values }
    }

    #[allow(missing_docs)]
    pub fn objective_value(&self) -> MNumber {
        self.objective_value
    }

    #[allow(missing_docs)]
    pub fn solution_values(&self) -> &[(String, f64)] {
        &self.solution_values
    }

    /// Value of a single variable, `None` if there is no variable with that name.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.solution_values.iter()
            .find(|(variable, _)| variable == name)
            .map(|&(_, value)| value)
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        writeln!(f, "Optimal solution found.")?;
        writeln!(f, "Objective value (Z) = {}", self.objective_value)?;
        writeln!(f, "Variable values:")?;
        for (name, value) in &self.solution_values {
            writeln!(f, "  {} = {:.4}", name, value)?;
        }

        Ok(())
    }
}

/// What a (possibly unfinished) simplex run tells the user.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum SolutionReport {
    /// An optimal basic feasible solution.
    Optimal(Solution),
    /// Artificial variables remain positive in an otherwise optimal basis.
    Infeasible {
        /// Objective value of the last tableau, including its `M` part.
        objective_value: MNumber,
    },
    /// The objective can be improved without bound.
    Unbounded,
    /// The state has not been solved yet.
    NotTerminated,
    /// The step limit was reached before a terminal state.
    IterationLimit {
        /// Number of pivots done before stopping.
        nr_iterations: usize,
    },
}

impl Display for SolutionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            SolutionReport::Optimal(solution) => solution.fmt(f),
            SolutionReport::Infeasible { objective_value } => write!(
                f,
                "Problem is Infeasible. Artificial variable(s) remain in the optimal basis with positive values. Z = {}",
                objective_value,
            ),
            SolutionReport::Unbounded => f.write_str(
                "Problem is Unbounded. The objective function can be decreased (for min) or increased (for max) indefinitely.",
            ),
            SolutionReport::NotTerminated => f.write_str("Solver did not reach a terminal state."),
            SolutionReport::IterationLimit { nr_iterations } => write!(
                f,
                "Stopped after {} iterations without reaching a terminal state.",
                nr_iterations,
            ),
        }
    }
}
