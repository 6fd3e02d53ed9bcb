//! # Modified distribution method
//!
//! Improves a complete initial solution. Every iteration computes dual values `u` and `v` with
//! `u[r] + v[c] = cost[r][c]` on the basic cells, and from those the opportunity cost
//! `cost[r][c] - (u[r] + v[c])` of every other cell. While some opportunity cost is negative, the
//! cheapest cell enters the basis: flow is shifted around the closed loop through it by the largest
//! amount `theta` that keeps all allocations nonnegative.
//!
//! Each phase of an iteration is a separate step, see `ModiPhase`.
use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::{EPSILON, Progress, SolveError};
use crate::algorithm::transportation::{Allocation, Cell, Method, TransportationState};
use crate::data::linear_algebra::matrix::DenseMatrix;

/// Allocations that fall below this value after shifting flow are removed.
pub const DROP_TOLERANCE: f64 = 1e-4;

/// The work done by the next step.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ModiPhase {
    DualVariables,
    OpportunityCosts,
    EnteringCell,
    ClosedLoop,
    Theta,
    Reallocate,
}

/// Intermediate results of the current MODI iteration.
///
/// Everything is reset once the allocations change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModiData {
    /// The work that the next step does.
    pub phase: ModiPhase,
    /// Dual value of each row, `None` while unknown.
    pub u: Vec<Option<f64>>,
    /// Dual value of each column, `None` while unknown.
    pub v: Vec<Option<f64>>,
    /// Zero for basic cells.
    pub opportunity_costs: DenseMatrix,
    /// The non-basic cell with the most negative opportunity cost, if there is a negative one.
    pub most_negative: Option<(Cell, f64)>,
    /// Cell that becomes basic, known once the opportunity costs are computed.
    pub entering: Option<Cell>,
    /// Cell on the loop that becomes non-basic, the first one with the smallest allocation.
    pub exiting: Option<Cell>,
    /// Starts at the entering cell, which gains flow. Every other cell loses flow.
    pub closed_loop: Vec<Cell>,
    /// Amount moved around the loop.
    pub theta: Option<f64>,
}

impl ModiData {
    fn new(nr_rows: usize, nr_columns: usize) -> Self {
        Self {
            phase: ModiPhase::DualVariables,
            u: vec![None; nr_rows],
            v: vec![None; nr_columns],
            opportunity_costs: DenseMatrix::zeros(nr_rows, nr_columns),
            most_negative: None,
            entering: None,
            exiting: None,
            closed_loop: Vec::new(),
            theta: None,
        }
    }
}

/// Start the MODI method from a complete initial solution.
///
/// # Errors
///
/// If the state is not complete, or if it is degenerate: with fewer than `rows + columns - 1`
/// basic cells, not all dual values can be determined.
pub fn initialize_modi(state: &TransportationState) -> Result<TransportationState, SolveError> {
    if state.status != Progress::Complete {
        return Err(SolveError::IncompleteInitialSolution);
    }
    let basic_cells = state.basic_cells().len();
    let expected = state.nr_rows() + state.nr_columns() - 1;
    if basic_cells < expected {
        return Err(SolveError::DegenerateSolution { basic_cells, expected });
    }

    debug!("Starting MODI from a solution with total cost {}", state.total_cost);
    let mut next = state.clone();
    next.method = Method::Modi;
    next.step = 0;
    next.status = Progress::Initial;
    next.is_optimal = None;
    next.modi = Some(ModiData::new(state.nr_rows(), state.nr_columns()));
    next.explanation = "MODI (Modified Distribution) Method initialized. Starting with u1 = 0 and calculating dual variables.".to_string();

    Ok(next)
}

/// Do the next phase of the MODI method.
///
/// # Errors
///
/// If the basic cells don't determine all dual values, or there is no closed loop through the
/// entering cell. Both happen only for degenerate solutions.
pub fn step(state: &TransportationState) -> Result<TransportationState, SolveError> {
    if state.status == Progress::Complete {
        return Ok(state.clone());
    }
    let modi = state.modi.as_ref().ok_or(SolveError::IncompleteInitialSolution)?;

    let mut next = state.clone();
    next.step += 1;
    next.status = Progress::Running;
    let (data, explanation) = match modi.phase {
        ModiPhase::DualVariables => compute_dual_variables(state, modi)?,
        ModiPhase::OpportunityCosts => {
            let (data, explanation) = compute_opportunity_costs(state, modi);
            next.is_optimal = Some(data.most_negative.is_none());
            (data, explanation)
        },
        ModiPhase::EnteringCell => match modi.most_negative {
            None => {
                next.status = Progress::Complete;
                debug!("MODI optimal with total cost {}", state.total_cost);
                (modi.clone(), "MODI optimization complete - solution is optimal!".to_string())
            },
            Some((cell, value)) => {
                let mut data = modi.clone();
                data.entering = Some(cell);
                data.phase = ModiPhase::ClosedLoop;
                (data, format!("Entering variable: x({},{}) with opportunity cost {:.2}", cell.row + 1, cell.column + 1, value))
            },
        },
        ModiPhase::ClosedLoop => find_closed_loop(state, modi)?,
        ModiPhase::Theta => compute_theta(state, modi),
        ModiPhase::Reallocate => {
            let (allocations, theta) = reallocate(state, modi);
            next.allocations = allocations;
            next.total_cost = next.compute_total_cost();
            next.is_optimal = None;
            debug!("Shifted {} units, total cost now {}", theta, next.total_cost);
            let explanation = format!(
                "Allocations updated using theta = {}. New total cost: {:.2}. Starting new MODI iteration to check optimality.",
                theta, next.total_cost,
            );
            (ModiData::new(state.nr_rows(), state.nr_columns()), explanation)
        },
    };
    next.modi = Some(data);
    next.explanation = explanation;

    Ok(next)
}

/// Solve `u[r] + v[c] = cost[r][c]` over the basic cells, starting from `u[0] = 0`.
fn compute_dual_variables(state: &TransportationState, modi: &ModiData) -> Result<(ModiData, String), SolveError> {
    let mut u = vec![None; state.nr_rows()];
    let mut v = vec![None; state.nr_columns()];
    u[0] = Some(0_f64);

    let basic_cells = state.basic_cells();
    for _ in 0..state.nr_rows() + state.nr_columns() {
        let mut changed = false;
        for &cell in &basic_cells {
            let cost = state.cost(cell);
            match (u[cell.row], v[cell.column]) {
                (Some(u_value), None) => {
                    v[cell.column] = Some(cost - u_value);
                    changed = true;
                },
                (None, Some(v_value)) => {
                    u[cell.row] = Some(cost - v_value);
                    changed = true;
                },
                _ => {},
            }
        }
        if !changed {
            break;
        }
    }

    let unresolved = |values: &[Option<f64>]| values.iter().positions(Option::is_none).collect::<Vec<_>>();
    let (rows, columns) = (unresolved(&u), unresolved(&v));
    if !rows.is_empty() || !columns.is_empty() {
        return Err(SolveError::UnresolvedDualVariables { rows, columns });
    }

    let format = |values: &[Option<f64>]| values.iter().flatten().map(|value| format!("{:.1}", value)).join(", ");
    let explanation = format!("Dual variables calculated: u = [{}], v = [{}]", format(&u), format(&v));
    trace!("{}", explanation);

    let mut data = modi.clone();
    data.u = u;
    data.v = v;
    data.phase = ModiPhase::OpportunityCosts;
    Ok((data, explanation))
}

/// `cost[r][c] - (u[r] + v[c])` for every non-basic cell.
fn compute_opportunity_costs(state: &TransportationState, modi: &ModiData) -> (ModiData, String) {
    let mut opportunity_costs = DenseMatrix::zeros(state.nr_rows(), state.nr_columns());
    let mut most_negative: Option<(Cell, f64)> = None;

    for row in 0..state.nr_rows() {
        for column in 0..state.nr_columns() {
            let cell = Cell::new(row, column);
            if state.is_basic(cell) {
                continue;
            }

            let dual = modi.u[row].unwrap_or(0_f64) + modi.v[column].unwrap_or(0_f64);
            let opportunity_cost = state.cost(cell) - dual;
            opportunity_costs[(row, column)] = opportunity_cost;
            if opportunity_cost < -EPSILON && most_negative.is_none_or(|(_, value)| opportunity_cost < value) {
                most_negative = Some((cell, opportunity_cost));
            }
        }
    }
    trace!("Opportunity costs:\n{}", opportunity_costs);

    let explanation = match most_negative {
        Some((cell, value)) => format!(
            "Opportunity costs calculated. Most negative: ({}, {}) = {:.2}. Solution is not optimal.",
            cell.row + 1, cell.column + 1, value,
        ),
        None => "All opportunity costs are non-negative. Current solution is optimal!".to_string(),
    };

    let mut data = modi.clone();
    data.opportunity_costs = opportunity_costs;
    data.most_negative = most_negative;
    data.phase = ModiPhase::EnteringCell;
    (data, explanation)
}

fn find_closed_loop(state: &TransportationState, modi: &ModiData) -> Result<(ModiData, String), SolveError> {
    let entering = modi.entering.ok_or(SolveError::IncompleteInitialSolution)?;
    let closed_loop = closed_loop(state, entering).ok_or(SolveError::NoClosedLoop(entering))?;

    let description = closed_loop.iter()
        .enumerate()
        .map(|(i, cell)| format!("{}({},{})", if i % 2 == 0 { "+" } else { "-" }, cell.row + 1, cell.column + 1))
        .join(" -> ");
    debug!("Closed loop: {}", description);

    let mut data = modi.clone();
    data.closed_loop = closed_loop;
    data.phase = ModiPhase::Theta;
    Ok((data, format!("Closed loop found: {}", description)))
}

/// Search a closed loop through `entering` whose other corners are all basic cells.
///
/// The path alternates between horizontal and vertical moves, starting horizontally, and is closed
/// by a vertical move back to the entering cell.
///
/// # Return value
///
/// The corners of the loop in order, starting with `entering`. `None` if there is no such loop.
pub fn closed_loop(state: &TransportationState, entering: Cell) -> Option<Vec<Cell>> {
    let mut path = vec![entering];
    if extend_loop(state, &mut path, true) {
        Some(path)
    } else {
        None
    }
}

/// Depth first search from the last cell of `path`.
fn extend_loop(state: &TransportationState, path: &mut Vec<Cell>, horizontal: bool) -> bool {
    if path.len() > state.nr_rows() + state.nr_columns() {
        return false;
    }

    let entering = path[0];
    let current = path[path.len() - 1];
    let candidates = if horizontal {
        (0..state.nr_columns())
            .filter(|&column| column != current.column)
            .map(|column| Cell::new(current.row, column))
            .collect::<Vec<_>>()
    } else {
        (0..state.nr_rows())
            .filter(|&row| row != current.row)
            .map(|row| Cell::new(row, current.column))
            .collect()
    };

    for next in candidates {
        if !horizontal && next == entering && path.len() >= 4 {
            return true;
        }
        if state.is_basic(next) && !path.contains(&next) {
            path.push(next);
            if extend_loop(state, path, !horizontal) {
                return true;
            }
            path.pop();
        }
    }

    false
}

/// The smallest allocation among the cells that lose flow.
fn compute_theta(state: &TransportationState, modi: &ModiData) -> (ModiData, String) {
    let mut smallest: Option<(Cell, f64)> = None;
    for &cell in modi.closed_loop.iter().skip(1).step_by(2) {
        let value = state.allocation(cell);
        if smallest.is_none_or(|(_, theta)| value < theta) {
            smallest = Some((cell, value));
        }
    }

    let mut data = modi.clone();
    data.phase = ModiPhase::Reallocate;
    let explanation = match smallest {
        Some((cell, theta)) => {
            data.theta = Some(theta);
            data.exiting = Some(cell);
            format!(
                "theta = {} (minimum value in negative cells). Exiting variable: x({},{})",
                theta, cell.row + 1, cell.column + 1,
            )
        },
        None => "Could not determine theta value.".to_string(),
    };

    (data, explanation)
}

/// Shift `theta` units around the closed loop.
///
/// # Return value
///
/// The new allocations, sorted by cell, and `theta`.
fn reallocate(state: &TransportationState, modi: &ModiData) -> (Vec<Allocation>, f64) {
    let theta = modi.theta.unwrap_or(0_f64);
    let mut allocations = state.allocations.clone();

    for (i, &cell) in modi.closed_loop.iter().enumerate() {
        let change = if i % 2 == 0 { theta } else { -theta };
        match allocations.binary_search_by_key(&cell, |allocation| allocation.cell) {
            Ok(index) => allocations[index].value += change,
            Err(index) => if change > 0_f64 {
                allocations.insert(index, Allocation { cell, value: change });
            },
        }
    }
    allocations.retain(|allocation| allocation.value > DROP_TOLERANCE);

    (allocations, theta)
}

#[cfg(test)]
mod test {
    use crate::algorithm::{Progress, SolveError, Stepwise};
    use crate::algorithm::transportation::{Cell, InitialMethod, Method, initialize};
    use crate::algorithm::transportation::modi::{ModiPhase, closed_loop, initialize_modi};
    use crate::data::transportation::TransportationProblem;
    use crate::tests::problem_2;

    fn complete(method: InitialMethod) -> crate::algorithm::transportation::TransportationState {
        initialize(&problem_2::problem(), method).unwrap().solve_all().unwrap().final_state().clone()
    }

    #[test]
    fn preconditions() {
        let state = initialize(&problem_2::problem(), InitialMethod::NorthwestCorner).unwrap();
        assert_eq!(initialize_modi(&state), Err(SolveError::IncompleteInitialSolution));

        let problem = TransportationProblem::new(vec![10_f64, 20_f64], vec![10_f64, 20_f64], vec![
            vec![1_f64, 2_f64],
            vec![3_f64, 1_f64],
        ]);
        let degenerate = initialize(&problem, InitialMethod::NorthwestCorner).unwrap()
            .solve_all().unwrap()
            .final_state().clone();
        assert_eq!(
            initialize_modi(&degenerate),
            Err(SolveError::DegenerateSolution { basic_cells: 2, expected: 3 }),
        );
    }

    #[test]
    fn phases() {
        let state = initialize_modi(&complete(InitialMethod::NorthwestCorner)).unwrap();
        assert_eq!(state.method(), Method::Modi);
        assert_eq!(state.total_cost(), 720_f64);

        // u = [0, 1, 3], v = [4, 7, 6]
        let state = state.step().unwrap();
        let modi = state.modi().unwrap();
        assert_eq!(modi.u, vec![Some(0_f64), Some(1_f64), Some(3_f64)]);
        assert_eq!(modi.v, vec![Some(4_f64), Some(7_f64), Some(6_f64)]);
        assert_eq!(modi.phase, ModiPhase::OpportunityCosts);

        let state = state.step().unwrap();
        assert_eq!(state.is_optimal(), Some(false));
        let modi = state.modi().unwrap();
        assert_eq!(modi.most_negative, Some((Cell::new(2, 1), -7_f64)));
        assert_eq!(modi.opportunity_costs[(0, 1)], -1_f64);

        let state = state.step().unwrap();
        assert_eq!(state.modi().unwrap().entering, Some(Cell::new(2, 1)));

        let state = state.step().unwrap();
        assert_eq!(state.modi().unwrap().closed_loop, vec![
            Cell::new(2, 1), Cell::new(2, 2), Cell::new(1, 2), Cell::new(1, 1),
        ]);

        let state = state.step().unwrap();
        assert_eq!(state.modi().unwrap().theta, Some(25_f64));
        assert_eq!(state.modi().unwrap().exiting, Some(Cell::new(1, 1)));

        let state = state.step().unwrap();
        assert_eq!(state.total_cost(), 545_f64);
        assert_eq!(state.allocation(Cell::new(1, 1)), 0_f64);
        assert_eq!(state.allocation(Cell::new(2, 1)), 25_f64);
        assert_eq!(state.is_optimal(), None);
        assert_eq!(state.modi().unwrap().phase, ModiPhase::DualVariables);
        assert_eq!(state.modi().unwrap().u[1], None);
    }

    #[test]
    fn loop_search() {
        let state = complete(InitialMethod::LeastCost);
        // Basic cells (0, 0), (1, 0), (1, 2), (2, 1), (2, 2)
        assert_eq!(closed_loop(&state, Cell::new(2, 0)), Some(vec![
            Cell::new(2, 0), Cell::new(2, 2), Cell::new(1, 2), Cell::new(1, 0),
        ]));
        assert_eq!(closed_loop(&state, Cell::new(0, 1)), Some(vec![
            Cell::new(0, 1), Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 2), Cell::new(2, 2), Cell::new(2, 1),
        ]));
    }

    #[test]
    fn optimal_is_stable() {
        let state = initialize_modi(&complete(InitialMethod::Vogel)).unwrap();
        let trace = state.solve_all().unwrap();

        assert_eq!(trace.len(), 4);
        let last = trace.final_state();
        assert_eq!(last.status(), Progress::Complete);
        assert_eq!(last.is_optimal(), Some(true));
        assert_eq!(last.total_cost(), 540_f64);
        assert_eq!(last.step().unwrap(), *last);

        // Restarting from an optimal solution changes nothing
        let again = initialize_modi(last).unwrap().solve_all().unwrap();
        assert_eq!(again.final_state().allocations(), last.allocations());
    }
}
