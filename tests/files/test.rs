use approx::assert_abs_diff_eq;

use stepwise_or::algorithm::{Limits, Progress, Stepwise};
use stepwise_or::algorithm::assignment;
use stepwise_or::algorithm::simplex::{self, SimplexStatus};
use stepwise_or::algorithm::transportation::{self, InitialMethod};
use stepwise_or::algorithm::transportation::modi::initialize_modi;
use stepwise_or::data::assignment::AssignmentProblem;
use stepwise_or::data::linear_program::problem::LinearProgram;
use stepwise_or::data::linear_program::solution::SolutionReport;
use stepwise_or::data::transportation::TransportationProblem;
use stepwise_or::io::error::ImportError;
use stepwise_or::io::import;

use super::get_test_file_path;

fn solve_linear_program(name: &str, extension: &str) -> SolutionReport {
    let _ = env_logger::builder().is_test(true).try_init();

    let problem: LinearProgram = import(&get_test_file_path(name, extension)).unwrap();
    let trace = simplex::initialize(&problem).unwrap().solve_all().unwrap();
    assert!(trace.converged());
    simplex::interpret_trace(&trace)
}

#[test]
fn production() {
    match solve_linear_program("production", "lp") {
        SolutionReport::Optimal(solution) => {
            assert_abs_diff_eq!(solution.objective_value().constant_part(), 400_f64);
            assert_abs_diff_eq!(solution.value("x1").unwrap(), 4_f64);
            assert_abs_diff_eq!(solution.value("x2").unwrap(), 8_f64);
        },
        other => panic!("{:?}", other),
    }
}

#[test]
fn diet() {
    match solve_linear_program("diet", "lp") {
        SolutionReport::Optimal(solution) => {
            assert_abs_diff_eq!(solution.objective_value().constant_part(), 9_f64, epsilon = 1e-9);
            assert_abs_diff_eq!(solution.objective_value().m_coefficient(), 0_f64, epsilon = 1e-9);
            assert_abs_diff_eq!(solution.value("x1").unwrap(), 3_f64, epsilon = 1e-9);
            assert_abs_diff_eq!(solution.value("x2").unwrap(), 1_f64, epsilon = 1e-9);
        },
        other => panic!("{:?}", other),
    }
}

#[test]
fn blend() {
    match solve_linear_program("blend", "json") {
        SolutionReport::Optimal(solution) => {
            assert_abs_diff_eq!(solution.objective_value().constant_part(), 11_f64, epsilon = 1e-9);
            assert_abs_diff_eq!(solution.value("x1").unwrap(), 3_f64, epsilon = 1e-9);
            assert_abs_diff_eq!(solution.value("x2").unwrap(), 1_f64, epsilon = 1e-9);
        },
        other => panic!("{:?}", other),
    }
}

#[test]
fn infeasible() {
    assert!(matches!(solve_linear_program("infeasible", "lp"), SolutionReport::Infeasible { .. }));
}

#[test]
fn missing_file() {
    let result = import::<LinearProgram>(&get_test_file_path("does_not_exist", "lp"));
    assert!(matches!(result, Err(ImportError::IO(_))));
}

#[test]
fn warehouses() {
    let problem: TransportationProblem = import(&get_test_file_path("warehouses", "json")).unwrap();

    for (method, initial_cost) in [
        (InitialMethod::NorthwestCorner, 720_f64),
        (InitialMethod::LeastCost, 545_f64),
        (InitialMethod::Vogel, 540_f64),
    ] {
        let trace = transportation::initialize(&problem, method).unwrap().solve_all().unwrap();
        let initial = trace.final_state();
        assert_eq!(initial.total_cost(), initial_cost);
        assert_eq!(initial.source_label(0), "Leeds");
        assert_eq!(initial.destination_label(2), "Kent");

        let trace = initialize_modi(initial).unwrap().solve_all().unwrap();
        assert_eq!(trace.final_state().total_cost(), 540_f64);
        assert_eq!(trace.final_state().is_optimal(), Some(true));
    }
}

#[test]
fn excess_supply() {
    let problem: TransportationProblem = import(&get_test_file_path("excess_supply", "json")).unwrap();
    let trace = transportation::initialize(&problem, InitialMethod::NorthwestCorner).unwrap()
        .solve_all().unwrap();
    let initial = trace.final_state();
    assert_eq!(initial.nr_columns(), 3);
    assert_eq!(initial.destination_label(2), "Dummy");
    assert_eq!(initial.total_cost(), 105_f64);

    let trace = initialize_modi(initial).unwrap().solve_all().unwrap();
    assert_eq!(trace.final_state().total_cost(), 65_f64);
    // One improvement and the optimality check
    assert_eq!(trace.len(), 10);
}

#[test]
fn workers() {
    let problem: AssignmentProblem = import(&get_test_file_path("workers", "json")).unwrap();
    let trace = assignment::initialize(&problem).unwrap()
        .solve_all_with(&Limits::default()).unwrap();
    let last = trace.final_state();

    assert_eq!(last.status(), Progress::Complete);
    assert_eq!(last.total_cost(), 31_f64);
    let names = last.assignments().iter()
        .map(|assignment| format!(
            "{}-{}",
            last.problem().row_labels[assignment.row],
            last.problem().column_labels[assignment.column],
        ))
        .collect::<Vec<_>>();
    for expected in ["Ann-C1", "Bob-C3", "Cas-C4", "Dummy-4-C2"] {
        assert!(names.iter().any(|name| name == expected), "{} missing in {:?}", expected, names);
    }
}

#[test]
fn step_limit() {
    let problem: TransportationProblem = import(&get_test_file_path("warehouses", "json")).unwrap();
    let initial = transportation::initialize(&problem, InitialMethod::NorthwestCorner).unwrap();
    let trace = initial.solve_all_with(&Limits { max_states: 3 }).unwrap();

    assert!(!trace.converged());
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.outcome(), Err(2));
    assert_eq!(trace.final_state().status(), Progress::Running);
}

#[test]
fn simplex_status_names() {
    let problem: LinearProgram = import(&get_test_file_path("production", "lp")).unwrap();
    let state = simplex::initialize(&problem).unwrap();
    assert_eq!(state.status(), SimplexStatus::Initial);
    assert_eq!(state.formulation(), "max z = 40x1 + 30x2\nx1 + x2 + s1 = 12\n2x1 + x2 + s2 = 16");
}
