//! # Properties of the solvers on random problems
//!
//! Random problems are kept small so that the answers can be checked exhaustively.
use std::cmp::Ordering;

use itertools::Itertools;
use proptest::collection::vec;
use proptest::prelude::*;

use stepwise_or::algorithm::{EPSILON, Limits, Progress, SolveError, Stepwise};
use stepwise_or::algorithm::assignment;
use stepwise_or::algorithm::simplex::{self, SimplexState};
use stepwise_or::algorithm::simplex::pivot_rule::FirstProfitable;
use stepwise_or::algorithm::transportation::{self, InitialMethod, TransportationState};
use stepwise_or::algorithm::transportation::modi::initialize_modi;
use stepwise_or::data::assignment::AssignmentProblem;
use stepwise_or::data::linear_program::elements::ConstraintType;
use stepwise_or::data::linear_program::problem::{Constraint, LinearProgram, ObjectiveFunction};
use stepwise_or::data::linear_program::solution::SolutionReport;
use stepwise_or::data::number_types::big_m::MNumber;
use stepwise_or::data::transportation::TransportationProblem;

const TOLERANCE: f64 = 1e-6;

/// Enough room for any of the problem sizes generated below.
const LIMITS: Limits = Limits { max_states: 1_000 };

fn transportation_problem() -> impl Strategy<Value = TransportationProblem> {
    (1..=4_usize, 1..=4_usize).prop_flat_map(|(m, n)| (
        vec(1..=30_u32, m),
        vec(1..=30_u32, n),
        vec(vec(1..=20_u32, n), m),
    )).prop_map(|(supply, demand, costs)| TransportationProblem::new(
        supply.into_iter().map(f64::from).collect(),
        demand.into_iter().map(f64::from).collect(),
        costs.into_iter().map(|row| row.into_iter().map(f64::from).collect()).collect(),
    ))
}

fn assignment_problem() -> impl Strategy<Value = AssignmentProblem> {
    (1..=4_usize, 1..=4_usize, any::<bool>())
        .prop_flat_map(|(m, n, is_maximization)| (vec(vec(0..=25_u32, n), m), Just(is_maximization)))
        .prop_map(|(costs, is_maximization)| {
            let mut problem = AssignmentProblem::new(
                costs.into_iter().map(|row| row.into_iter().map(f64::from).collect()).collect(),
            );
            problem.is_maximization = is_maximization;
            problem
        })
}

/// A bounded, feasible maximization problem: all data positive, all constraints `<=`.
fn packing_problem() -> impl Strategy<Value = LinearProgram> {
    (2..=3_usize, 1..=3_usize).prop_flat_map(|(n, m)| (
        vec(1..=9_u32, n),
        vec((vec(1..=9_u32, n), 1..=40_u32), m),
    )).prop_map(|(objective, constraints)| {
        let variables = (1..=objective.len()).map(|i| format!("x{}", i)).collect::<Vec<_>>();
        LinearProgram {
            objective: ObjectiveFunction {
                coefficients: objective.into_iter().map(f64::from).collect(),
                variables: variables.clone(),
            },
            constraints: constraints.into_iter()
                .map(|(coefficients, rhs)| Constraint {
                    coefficients: coefficients.into_iter().map(f64::from).collect(),
                    variables: variables.clone(),
                    constraint_type: ConstraintType::Less,
                    rhs: f64::from(rhs),
                })
                .collect(),
            is_maximization: true,
        }
    })
}

fn constraint_type() -> impl Strategy<Value = ConstraintType> {
    prop_oneof![Just(ConstraintType::Less), Just(ConstraintType::Greater), Just(ConstraintType::Equal)]
}

/// A problem in two variables with constraints of any type, signs and direction.
///
/// The last constraint `x1 + x2 <= 20` keeps the feasible region bounded.
fn mixed_problem() -> impl Strategy<Value = LinearProgram> {
    (
        vec(-5..=5_i32, 2),
        vec((vec(-5..=9_i32, 2), constraint_type(), -10..=30_i32), 1..=3),
        any::<bool>(),
    ).prop_map(|(objective, constraints, is_maximization)| {
        let variables = vec!["x1".to_string(), "x2".to_string()];
        let bound = Constraint {
            coefficients: vec![1_f64, 1_f64],
            variables: variables.clone(),
            constraint_type: ConstraintType::Less,
            rhs: 20_f64,
        };
        LinearProgram {
            objective: ObjectiveFunction {
                coefficients: objective.into_iter().map(f64::from).collect(),
                variables: variables.clone(),
            },
            constraints: constraints.into_iter()
                .map(|(coefficients, constraint_type, rhs)| Constraint {
                    coefficients: coefficients.into_iter().map(f64::from).collect(),
                    variables: variables.clone(),
                    constraint_type,
                    rhs: f64::from(rhs),
                })
                .chain(std::iter::once(bound))
                .collect(),
            is_maximization,
        }
    })
}

/// Optimal objective value of a bounded problem in two variables, by enumerating the vertices.
///
/// `None` if no vertex is feasible.
fn best_vertex(problem: &LinearProgram) -> Option<f64> {
    let lines = problem.constraints.iter()
        .map(|constraint| ([constraint.coefficients[0], constraint.coefficients[1]], constraint.rhs))
        .chain([([1_f64, 0_f64], 0_f64), ([0_f64, 1_f64], 0_f64)])
        .collect::<Vec<_>>();
    let is_feasible = |x: &[f64; 2]| {
        x.iter().all(|&value| value >= -TOLERANCE) && problem.constraints.iter().all(|constraint| {
            let lhs = constraint.coefficients[0] * x[0] + constraint.coefficients[1] * x[1];
            match constraint.constraint_type {
                ConstraintType::Less => lhs <= constraint.rhs + TOLERANCE,
                ConstraintType::Greater => lhs >= constraint.rhs - TOLERANCE,
                ConstraintType::Equal => (lhs - constraint.rhs).abs() <= TOLERANCE,
            }
        })
    };

    lines.iter().tuple_combinations()
        .filter_map(|((a, b), (c, d))| {
            let determinant = a[0] * c[1] - a[1] * c[0];
            (determinant.abs() > 1e-9)
                .then(|| [(b * c[1] - a[1] * d) / determinant, (a[0] * d - b * c[0]) / determinant])
        })
        .filter(is_feasible)
        .map(|x| problem.objective.coefficients[0] * x[0] + problem.objective.coefficients[1] * x[1])
        .reduce(|a, b| if problem.is_maximization { a.max(b) } else { a.min(b) })
}

/// Step with Bland's rule until a terminal state, or until `LIMITS` is reached.
fn solve_first_profitable(start: &SimplexState) -> Result<Vec<SimplexState>, SolveError> {
    let mut states = vec![start.clone()];
    let mut current = start.clone();
    while !current.is_terminal() && states.len() < LIMITS.max_states {
        current = current.step_with::<FirstProfitable>()?;
        states.push(current.clone());
    }
    Ok(states)
}

fn rhs_is_nonnegative(states: &[SimplexState]) -> Result<(), TestCaseError> {
    for state in states {
        prop_assert!(
            state.rhs().iter().all(|&value| value >= -EPSILON),
            "negative right hand side after iteration {}: {:?}", state.iteration(), state.rhs(),
        );
    }
    Ok(())
}

/// Row and column totals of the allocations.
fn shipped(state: &TransportationState) -> (Vec<f64>, Vec<f64>) {
    let mut rows = vec![0_f64; state.nr_rows()];
    let mut columns = vec![0_f64; state.nr_columns()];
    for allocation in state.allocations() {
        rows[allocation.cell.row] += allocation.value;
        columns[allocation.cell.column] += allocation.value;
    }
    (rows, columns)
}

fn assert_close(left: &[f64], right: &[f64]) -> Result<(), TestCaseError> {
    prop_assert_eq!(left.len(), right.len());
    for (a, b) in left.iter().zip(right) {
        prop_assert!((a - b).abs() < TOLERANCE, "{:?} != {:?}", left, right);
    }
    Ok(())
}

fn best_assignment(problem: &AssignmentProblem) -> f64 {
    let balanced = problem.balance();
    let n = balanced.nr_rows();
    let totals = (0..n).permutations(n)
        .map(|columns| columns.iter().enumerate().map(|(row, &column)| balanced.costs[row][column]).sum::<f64>());
    if problem.is_maximization {
        totals.fold(f64::NEG_INFINITY, f64::max)
    } else {
        totals.fold(f64::INFINITY, f64::min)
    }
}

#[test]
fn penalty_scale() {
    // However large the constant, one unit of M is larger
    assert_eq!(MNumber::penalty(1_f64).compare(&MNumber::constant(1e300)), Ordering::Greater);
    assert!(MNumber::new(-1e300, 1e-3).is_positive());
}

proptest! {
    #[test]
    fn m_dominates_constants(
        (c1, c2) in (-1e6..1e6_f64, -1e6..1e6_f64),
        (m1, m2) in (-100..100_i32, -100..100_i32),
    ) {
        prop_assume!(m1 != m2);

        let left = MNumber::new(c1, f64::from(m1));
        let right = MNumber::new(c2, f64::from(m2));
        prop_assert_eq!(left.compare(&right), m1.cmp(&m2));
        prop_assert_eq!((left - right).is_positive(), m1 > m2);
    }

    #[test]
    fn initial_solutions_ship_everything(problem in transportation_problem()) {
        let balanced = problem.balance();
        for method in [InitialMethod::NorthwestCorner, InitialMethod::LeastCost, InitialMethod::Vogel] {
            let trace = transportation::initialize(&problem, method).unwrap().solve_all_with(&LIMITS).unwrap();
            prop_assert!(trace.converged());

            let last = trace.final_state();
            prop_assert_eq!(last.status(), Progress::Complete);
            prop_assert!(last.basic_cells().len() < last.nr_rows() + last.nr_columns());
            let (rows, columns) = shipped(last);
            assert_close(&rows, &balanced.supply)?;
            assert_close(&columns, &balanced.demand)?;
            prop_assert_eq!(&last.step().unwrap(), last);
        }
    }

    #[test]
    fn modi_never_increases_cost(problem in transportation_problem()) {
        let initial = transportation::initialize(&problem, InitialMethod::NorthwestCorner).unwrap()
            .solve_all_with(&LIMITS).unwrap()
            .final_state().clone();
        let start = match initialize_modi(&initial) {
            Ok(state) => state,
            Err(SolveError::DegenerateSolution { .. }) => return Ok(()),
            Err(error) => return Err(TestCaseError::fail(error.to_string())),
        };

        match start.solve_all_with(&LIMITS) {
            Ok(trace) => {
                let costs = trace.states().iter().map(TransportationState::total_cost).collect::<Vec<_>>();
                prop_assert!(costs.iter().tuple_windows().all(|(a, b)| *b <= *a + TOLERANCE));

                let last = trace.final_state();
                prop_assert_eq!(last.is_optimal(), Some(true));
                let balanced = problem.balance();
                let (rows, columns) = shipped(last);
                assert_close(&rows, &balanced.supply)?;
                assert_close(&columns, &balanced.demand)?;
            },
            // A tie in theta can make a later iteration degenerate
            Err(SolveError::UnresolvedDualVariables { .. } | SolveError::NoClosedLoop(_)) => {},
            Err(error) => return Err(TestCaseError::fail(error.to_string())),
        }
    }

    #[test]
    fn hungarian_is_optimal(problem in assignment_problem()) {
        let trace = assignment::initialize(&problem).unwrap().solve_all_with(&LIMITS).unwrap();
        prop_assert!(trace.converged());

        let last = trace.final_state();
        let n = last.problem().nr_rows();
        prop_assert_eq!(last.assignments().len(), n);
        prop_assert!(last.assignments().iter().map(|assignment| assignment.row).all_unique());
        prop_assert!(last.assignments().iter().map(|assignment| assignment.column).all_unique());
        prop_assert!((last.total_cost() - best_assignment(&problem)).abs() < TOLERANCE);
        prop_assert_eq!(&last.step().unwrap(), last);
    }

    #[test]
    fn simplex_solutions_are_feasible(problem in packing_problem()) {
        let trace = simplex::initialize(&problem).unwrap().solve_all_with(&LIMITS).unwrap();
        let solution = match simplex::interpret_trace(&trace) {
            SolutionReport::Optimal(solution) => solution,
            other => return Err(TestCaseError::fail(format!("{:?}", other))),
        };

        let x = problem.objective.variables.iter()
            .map(|name| solution.value(name).unwrap_or(0_f64))
            .collect::<Vec<_>>();
        prop_assert!(x.iter().all(|&value| value > -TOLERANCE));
        for constraint in &problem.constraints {
            let lhs = constraint.coefficients.iter().zip(&x).map(|(a, b)| a * b).sum::<f64>();
            prop_assert!(lhs <= constraint.rhs + TOLERANCE);
        }

        let z = problem.objective.coefficients.iter().zip(&x).map(|(c, value)| c * value).sum::<f64>();
        prop_assert_eq!(solution.objective_value().m_coefficient(), 0_f64);
        prop_assert!((solution.objective_value().constant_part() - z).abs() < TOLERANCE);
        prop_assert_eq!(&trace.final_state().step().unwrap(), trace.final_state());
    }

    #[test]
    fn big_m_matches_vertex_enumeration(problem in mixed_problem()) {
        let start = simplex::initialize(&problem).unwrap();
        let trace = start.solve_all_with(&LIMITS).unwrap();
        prop_assert!(trace.converged());
        rhs_is_nonnegative(trace.states())?;

        let objective_value = match (simplex::interpret_trace(&trace), best_vertex(&problem)) {
            (SolutionReport::Optimal(solution), Some(best)) => {
                let value = solution.objective_value();
                prop_assert!(value.m_coefficient().abs() < TOLERANCE, "{}", value);
                prop_assert!((value.constant_part() - best).abs() < TOLERANCE, "{} != {}", value, best);
                Some(value.constant_part())
            },
            (SolutionReport::Infeasible { .. }, None) => None,
            (report, best) => return Err(TestCaseError::fail(format!("{:?}, expected {:?}", report, best))),
        };

        // Another pivot rule may take a different path, but ends at the same value
        let states = solve_first_profitable(&start).unwrap();
        let last = states.last().unwrap();
        prop_assert!(last.is_terminal());
        rhs_is_nonnegative(&states)?;
        match (simplex::interpret_solution(last), objective_value) {
            (SolutionReport::Optimal(solution), Some(value)) => {
                prop_assert!((solution.objective_value().constant_part() - value).abs() < TOLERANCE);
            },
            (SolutionReport::Infeasible { .. }, None) => {},
            (report, value) => return Err(TestCaseError::fail(format!("{:?}, expected {:?}", report, value))),
        }
    }
}
