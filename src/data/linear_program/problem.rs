//! # Linear program input
//!
//! The records a caller fills in to describe a linear program. They are deliberately close to what
//! a person writes down: named variables with coefficients, no standardization.
use serde::{Deserialize, Serialize};

use crate::algorithm::SolveError;
use crate::data::linear_program::elements::{ConstraintType, Objective};

/// Objective function: coefficients for named variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveFunction {
    /// Coefficient of each variable, in the order of `variables`.
    pub coefficients: Vec<f64>,
    /// Variable names.
    pub variables: Vec<String>,
}

impl ObjectiveFunction {
    /// Coefficient of a variable, zero if it doesn't appear.
    pub fn coefficient(&self, variable: &str) -> f64 {
        self.variables.iter()
            .position(|name| name == variable)
            .map_or(0_f64, |index| self.coefficients[index])
    }
}

/// A single linear (in)equality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Coefficient of each variable, in the order of `variables`.
    pub coefficients: Vec<f64>,
    /// Variable names, may include names that are not in the objective function.
    pub variables: Vec<String>,
    /// Relation between the left and right hand side.
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    /// Right hand side, may be negative.
    pub rhs: f64,
}

impl Constraint {
    /// Coefficient of a variable, zero if it doesn't appear.
    pub fn coefficient(&self, variable: &str) -> f64 {
        self.variables.iter()
            .position(|name| name == variable)
            .map_or(0_f64, |index| self.coefficients[index])
    }

    /// Whether this constraint only states that a single variable is nonnegative.
    ///
    /// These are implied by the simplex method and not added to the tableau.
    pub fn is_nonnegativity_bound(&self) -> bool {
        let mut nonzero = self.coefficients.iter().filter(|&&coefficient| coefficient != 0_f64);
        self.constraint_type == ConstraintType::Greater
            && self.rhs == 0_f64
            && matches!((nonzero.next(), nonzero.next()), (Some(&c), None) if c > 0_f64)
    }
}

/// A linear program as entered by the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearProgram {
    /// Function to optimize.
    pub objective: ObjectiveFunction,
    /// Constraints other than the implied nonnegativity of all variables.
    pub constraints: Vec<Constraint>,
    /// Maximize the objective function, instead of minimizing it.
    pub is_maximization: bool,
}

impl LinearProgram {
    /// Direction of optimization.
    pub fn direction(&self) -> Objective {
        Objective::from(self.is_maximization)
    }

    /// Check that every coefficient list matches its variable list.
    ///
    /// # Errors
    ///
    /// A `SolveError::InvalidProblem` describing the first mismatch.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.objective.coefficients.len() != self.objective.variables.len() {
            return Err(SolveError::InvalidProblem(format!(
                "objective has {} coefficients for {} variables",
                self.objective.coefficients.len(), self.objective.variables.len(),
            )));
        }
        for (i, constraint) in self.constraints.iter().enumerate() {
            if constraint.coefficients.len() != constraint.variables.len() {
                return Err(SolveError::InvalidProblem(format!(
                    "constraint {} has {} coefficients for {} variables",
                    i + 1, constraint.coefficients.len(), constraint.variables.len(),
                )));
            }
        }
        let all_values = self.objective.coefficients.iter()
            .chain(self.constraints.iter().flat_map(|c| c.coefficients.iter().chain(std::iter::once(&c.rhs))));
        if all_values.into_iter().any(|value| !value.is_finite()) {
            return Err(SolveError::InvalidProblem("all coefficients must be finite".to_string()));
        }

        Ok(())
    }

    /// All variable names: those of the objective in order, followed by any that only appear in
    /// constraints, in order of first appearance.
    pub fn variable_names(&self) -> Vec<String> {
        let mut names = self.objective.variables.clone();
        for constraint in &self.constraints {
            for name in &constraint.variables {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }

        names
    }
}
