//! # The Big-M simplex method
//!
//! A dense tableau implementation of the primal simplex method, meant to be followed pivot by
//! pivot. Problems that are maximizations with only `<=` constraints start from the slack basis.
//! All other problems get artificial variables for their `>=` and `=` rows, which are penalized in
//! the cost row with a symbolic `M` (see `MNumber`).
use enum_map::EnumMap;
use itertools::Itertools;
use log::{debug, trace};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::algorithm::{EPSILON, SolveError, Stepwise, Trace};
use crate::algorithm::simplex::pivot_rule::{LargestCoefficient, PivotRule, pivot_info};
use crate::data::linear_algebra::matrix::DenseMatrix;
use crate::data::linear_program::elements::{ConstraintType, Objective, VariableKind};
use crate::data::linear_program::problem::LinearProgram;
use crate::data::linear_program::solution::{Solution, SolutionReport};
use crate::data::number_types::big_m::MNumber;

pub mod formulation;
pub mod pivot_rule;

/// Where the simplex method is in solving the problem.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SimplexStatus {
    Initial,
    Running,
    Optimal,
    Infeasible,
    Unbounded,
}

impl SimplexStatus {
    /// Whether the method has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Optimal | Self::Infeasible | Self::Unbounded)
    }
}

/// A snapshot of the simplex tableau.
///
/// The body of the tableau has a row for each constraint and a column for each variable, including
/// slack, surplus and artificial variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimplexState {
    /// Cost coefficient `Cj` of each column.
    cost: Vec<MNumber>,
    /// Name of each column.
    variables: Vec<String>,
    /// Role of each column.
    kinds: Vec<VariableKind>,
    /// Column index of the basic variable of each row.
    basis: Vec<usize>,
    /// Cost `Cb` of the basic variable of each row.
    basic_cost: Vec<MNumber>,
    rhs: Vec<f64>,
    tableau: DenseMatrix,
    /// `Zj - Cj` of each column.
    relative_cost: Vec<MNumber>,
    objective_value: MNumber,
    objective: Objective,
    status: SimplexStatus,
    explanation: String,
    uses_big_m: bool,
    formulation: String,
    /// Number of pivots done.
    iteration: usize,
}

/// A constraint row after removing implied bounds and making the right hand side nonnegative.
struct Row {
    coefficients: Vec<f64>,
    constraint_type: ConstraintType,
    rhs: f64,
}

/// Build the initial tableau of a linear program.
///
/// Explicit nonnegativity bounds are dropped, as they are implied. Rows with a negative right hand
/// side are multiplied by `-1` first.
///
/// # Errors
///
/// If the coefficient lists don't match the variable lists.
pub fn initialize(problem: &LinearProgram) -> Result<SimplexState, SolveError> {
    problem.validate()?;

    let names = problem.variable_names();
    let objective = problem.direction();
    let rows = problem.constraints.iter()
        .filter(|constraint| !constraint.is_nonnegativity_bound())
        .map(|constraint| {
            let coefficients = names.iter().map(|name| constraint.coefficient(name)).collect::<Vec<_>>();
            if constraint.rhs < 0_f64 {
                Row {
                    coefficients: coefficients.into_iter().map(|c| -c).collect(),
                    constraint_type: !constraint.constraint_type,
                    rhs: -constraint.rhs,
                }
            } else {
                Row { coefficients, constraint_type: constraint.constraint_type, rhs: constraint.rhs }
            }
        })
        .collect::<Vec<_>>();

    let mut counts = EnumMap::<ConstraintType, usize>::default();
    for row in &rows {
        counts[row.constraint_type] += 1;
    }
    let standard = objective.is_maximization() && counts[ConstraintType::Less] == rows.len();

    let mut variables = names.clone();
    let mut kinds = vec![VariableKind::Decision; names.len()];
    let mut cost = names.iter()
        .map(|name| MNumber::constant(problem.objective.coefficient(name)))
        .collect::<Vec<_>>();

    // Auxiliary columns of each row as (column, coefficient), the last one being basic.
    let mut auxiliary = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let mut add_column = |prefix: &str, kind: VariableKind, column_cost: MNumber| {
            variables.push(format!("{}{}", prefix, i + 1));
            kinds.push(kind);
            cost.push(column_cost);
            variables.len() - 1
        };

        auxiliary.push(match row.constraint_type {
            ConstraintType::Less => vec![(add_column("s", VariableKind::Slack, MNumber::zero()), 1_f64)],
            ConstraintType::Greater => vec![
                (add_column("s", VariableKind::Surplus, MNumber::zero()), -1_f64),
                (add_column("a", VariableKind::Artificial, objective.artificial_penalty()), 1_f64),
            ],
            ConstraintType::Equal => vec![
                (add_column("a", VariableKind::Artificial, objective.artificial_penalty()), 1_f64),
            ],
        });
    }

    let mut tableau = DenseMatrix::zeros(rows.len(), variables.len());
    let mut basis = Vec::with_capacity(rows.len());
    for (i, (row, columns)) in rows.iter().zip(&auxiliary).enumerate() {
        for (j, &coefficient) in row.coefficients.iter().enumerate() {
            tableau[(i, j)] = coefficient;
        }
        for &(j, coefficient) in columns {
            tableau[(i, j)] = coefficient;
        }
        // Every row has at least one auxiliary column
        basis.push(columns[columns.len() - 1].0);
    }
    let basic_cost = basis.iter().map(|&j| cost[j]).collect();
    let rhs = rows.iter().map(|row| row.rhs).collect();

    let uses_big_m = !standard;
    let mut state = SimplexState {
        relative_cost: vec![MNumber::zero(); variables.len()],
        cost,
        variables,
        kinds,
        basis,
        basic_cost,
        rhs,
        tableau,
        objective_value: MNumber::zero(),
        objective,
        status: SimplexStatus::Initial,
        explanation: if uses_big_m {
            "Big M Method (artificial variables included)".to_string()
        } else {
            "Standard Simplex Method".to_string()
        },
        uses_big_m,
        formulation: String::new(),
        iteration: 0,
    };
    state.formulation = formulation::write(&state);
    state.recompute();

    debug!("Initialized {} tableau with {} rows and {} columns", if uses_big_m { "Big M" } else { "standard" }, state.nr_rows(), state.nr_columns());
    trace!("Formulation:\n{}", state.formulation);

    Ok(state)
}

impl SimplexState {
    /// Compute `Z = sum(Cb_i * rhs_i)` and `Zj - Cj = sum(Cb_i * a_ij) - Cj` for every column.
    fn recompute(&mut self) {
        self.objective_value = self.basic_cost.iter()
            .zip(&self.rhs)
            .map(|(&cb, &rhs)| cb * rhs)
            .sum();

        self.relative_cost = (0..self.nr_columns())
            .map(|j| {
                let zj: MNumber = self.basic_cost.iter()
                    .zip(self.tableau.rows())
                    .map(|(&cb, row)| cb * row[j])
                    .sum();
                zj - self.cost[j]
            })
            .collect();
    }

    /// Compute the next state using a specific pivot rule.
    ///
    /// # Errors
    ///
    /// If the entering column has positive coefficients, but none of them gives a nonnegative
    /// ratio. This can't happen from a feasible basis.
    pub fn step_with<PR: PivotRule>(&self) -> Result<Self, SolveError> {
        if self.status.is_terminal() {
            return Ok(self.clone());
        }

        let info = pivot_info::<PR>(self);
        let mut next = self.clone();

        let column = match info.entering_column {
            None => {
                if self.has_artificial_in_basis() {
                    next.status = SimplexStatus::Infeasible;
                    next.explanation = "Optimal tableau reached, but artificial variables remain in the basis with positive values. Problem is infeasible.".to_string();
                } else {
                    next.status = SimplexStatus::Optimal;
                    next.explanation = format!(
                        "Optimal solution found (all Zj - Cj {} 0).",
                        if self.objective.is_maximization() { ">=" } else { "<=" },
                    );
                }
                debug!("Terminal after {} pivots: {:?}", self.iteration, next.status);
                return Ok(next);
            },
            Some(column) => column,
        };

        let entering = &self.variables[column];
        if info.is_unbounded {
            next.status = SimplexStatus::Unbounded;
            next.explanation = format!(
                "Entering variable {} has no positive coefficients in its column. Problem is unbounded.",
                entering,
            );
            debug!("Column {} ({}) shows unboundedness", column, entering);
            return Ok(next);
        }

        let (row, ratio) = match (info.leaving_row, info.min_ratio) {
            (Some(row), Some(ratio)) => (row, ratio),
            _ => return Err(SolveError::RatioTestFailed { column }),
        };
        let leaving = &self.variables[self.basis[row]];
        let pivot = self.tableau[(row, column)];
        debug!("Pivot {}: {} enters, {} leaves (row {}, ratio {})", self.iteration + 1, entering, leaving, row, ratio);

        next.explanation = format!(
            "Entering variable: {} (Indicator value: {}). Leaving variable: {} (Min ratio: {:.2} at row {}). Pivot element: {:.2}.",
            entering, self.relative_cost[column], leaving, ratio, row + 1, pivot,
        );
        next.pivot(row, column);
        next.status = SimplexStatus::Running;
        next.iteration += 1;
        trace!("Tableau after pivot:\n{}", next.tableau);

        Ok(next)
    }

    /// Bring column `column` into the basis at row `row`.
    fn pivot(&mut self, row: usize, column: usize) {
        debug_assert!(row < self.nr_rows());
        debug_assert!(column < self.nr_columns());

        let pivot = self.tableau[(row, column)];
        debug_assert!(pivot > EPSILON);

        self.tableau.multiply_row(row, 1_f64 / pivot);
        self.rhs[row] /= pivot;

        for i in (0..self.nr_rows()).filter(|&i| i != row) {
            let factor = self.tableau[(i, column)];
            if factor != 0_f64 {
                self.tableau.mul_add_rows(row, i, -factor);
                self.rhs[i] -= factor * self.rhs[row];
            }
        }

        // Cancellation leaves values like `-1.8e-15` where the exact result is zero
        self.tableau = self.tableau.map(|value| if value.abs() <= EPSILON { 0_f64 } else { value });
        for value in &mut self.rhs {
            if value.abs() <= EPSILON {
                *value = 0_f64;
            }
        }

        self.basis[row] = column;
        self.basic_cost[row] = self.cost[column];
        self.recompute();
    }

    /// Whether an artificial variable is basic with a positive value.
    ///
    /// If that is the case in an optimal tableau, the problem is infeasible.
    pub fn has_artificial_in_basis(&self) -> bool {
        self.basis.iter()
            .zip(&self.rhs)
            .any(|(&j, &value)| self.kinds[j] == VariableKind::Artificial && value > EPSILON)
    }

    /// Names of the basic variables, one per row.
    pub fn basis(&self) -> Vec<&str> {
        self.basis.iter().map(|&j| self.variables[j].as_str()).collect()
    }

    /// Current value of every variable that isn't artificial, basic variables taking their right
    /// hand side and all others being zero.
    pub fn variable_values(&self) -> Vec<(String, f64)> {
        (0..self.nr_columns())
            .filter(|&j| self.kinds[j] != VariableKind::Artificial)
            .map(|j| {
                let value = self.basis.iter()
                    .position(|&basic| basic == j)
                    .map_or(0_f64, |i| self.rhs[i]);
                (self.variables[j].clone(), value)
            })
            .collect()
    }

    #[allow(missing_docs)]
    pub fn cost(&self) -> &[MNumber] {
        &self.cost
    }
    #[allow(missing_docs)]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
    #[allow(missing_docs)]
    pub fn kinds(&self) -> &[VariableKind] {
        &self.kinds
    }
    #[allow(missing_docs)]
    pub fn basic_cost(&self) -> &[MNumber] {
        &self.basic_cost
    }
    #[allow(missing_docs)]
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }
    #[allow(missing_docs)]
    pub fn tableau(&self) -> &DenseMatrix {
        &self.tableau
    }
    /// The `Zj - Cj` row.
    pub fn relative_cost(&self) -> &[MNumber] {
        &self.relative_cost
    }
    #[allow(missing_docs)]
    pub fn objective_value(&self) -> MNumber {
        self.objective_value
    }
    #[allow(missing_docs)]
    pub fn objective(&self) -> Objective {
        self.objective
    }
    #[allow(missing_docs)]
    pub fn status(&self) -> SimplexStatus {
        self.status
    }
    /// What happened in the step that produced this state.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
    /// Whether the problem was set up with artificial variables and the Big M method.
    pub fn uses_big_m(&self) -> bool {
        self.uses_big_m
    }
    /// Human readable form of the standardized problem.
    pub fn formulation(&self) -> &str {
        &self.formulation
    }
    /// Number of pivots that led to this state.
    pub fn iteration(&self) -> usize {
        self.iteration
    }
    /// Number of constraint rows.
    pub fn nr_rows(&self) -> usize {
        self.basis.len()
    }
    /// Number of variables, including slack, surplus and artificial ones.
    pub fn nr_columns(&self) -> usize {
        self.variables.len()
    }
}

impl Stepwise for SimplexState {
    fn step(&self) -> Result<Self, SolveError> {
        self.step_with::<LargestCoefficient>()
    }

    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Read the solution from a state.
///
/// # Return value
///
/// For an optimal state the objective value and the values of all variables that aren't
/// artificial. The feasibility of the basis is checked once more.
pub fn interpret_solution(state: &SimplexState) -> SolutionReport {
    match state.status {
        SimplexStatus::Optimal if state.has_artificial_in_basis() => {
            SolutionReport::Infeasible { objective_value: state.objective_value }
        },
        SimplexStatus::Optimal => {
            SolutionReport::Optimal(Solution::new(state.objective_value, state.variable_values()))
        },
        SimplexStatus::Infeasible => SolutionReport::Infeasible { objective_value: state.objective_value },
        SimplexStatus::Unbounded => SolutionReport::Unbounded,
        SimplexStatus::Initial | SimplexStatus::Running => SolutionReport::NotTerminated,
    }
}

/// Read the solution from the last state of a trace.
///
/// A trace that hit its step limit is reported as such, rather than presenting the last state.
pub fn interpret_trace(trace: &Trace<SimplexState>) -> SolutionReport {
    match trace.outcome() {
        Ok(state) => interpret_solution(state),
        Err(nr_iterations) => SolutionReport::IterationLimit { nr_iterations },
    }
}

/// Explanation of all states of a trace, one per line.
pub fn explain(trace: &Trace<SimplexState>) -> String {
    trace.states().iter()
        .map(|state| format!("[{}] {}", state.iteration, state.explanation))
        .join("\n")
}
