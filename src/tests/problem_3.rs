//! Four workers, four jobs.
use itertools::Itertools;

use crate::algorithm::{Progress, Stepwise};
use crate::algorithm::assignment::{HungarianState, Phase, initialize};
use crate::data::assignment::AssignmentProblem;
use crate::io::from_str;

pub const JSON_LITERAL_STRING: &str = r#"{
    "costs": [
        [82, 83, 69, 92],
        [77, 37, 49, 92],
        [11, 69, 5, 86],
        [8, 9, 98, 23]
    ],
    "row_labels": ["Ann", "Bob", "Cas", "Dee"],
    "column_labels": ["Paint", "Wire", "Pipe", "Tile"]
}"#;

pub fn problem() -> AssignmentProblem {
    let mut problem = AssignmentProblem::new(vec![
        vec![82_f64, 83_f64, 69_f64, 92_f64],
        vec![77_f64, 37_f64, 49_f64, 92_f64],
        vec![11_f64, 69_f64, 5_f64, 86_f64],
        vec![8_f64, 9_f64, 98_f64, 23_f64],
    ]);
    problem.row_labels = ["Ann", "Bob", "Cas", "Dee"].map(String::from).to_vec();
    problem.column_labels = ["Paint", "Wire", "Pipe", "Tile"].map(String::from).to_vec();
    problem
}

/// Best total over all permutations.
fn brute_force(problem: &AssignmentProblem) -> f64 {
    let n = problem.nr_rows();
    let totals = (0..n).permutations(n)
        .map(|columns| columns.iter().enumerate().map(|(row, &column)| problem.costs[row][column]).sum::<f64>());
    if problem.is_maximization {
        totals.fold(f64::NEG_INFINITY, f64::max)
    } else {
        totals.fold(f64::INFINITY, f64::min)
    }
}

fn assert_is_permutation(state: &HungarianState) {
    let n = state.problem().nr_rows();
    assert_eq!(state.assignments().len(), n);
    assert!(state.assignments().iter().map(|assignment| assignment.row).all_unique());
    assert!(state.assignments().iter().map(|assignment| assignment.column).all_unique());
}

#[test]
fn read_json() {
    let parsed: AssignmentProblem = from_str(JSON_LITERAL_STRING, "json").unwrap();
    assert_eq!(parsed, problem());
    assert!(!parsed.is_maximization);
}

#[test]
fn minimize() {
    let _ = env_logger::builder().is_test(true).try_init();

    let trace = initialize(&problem()).unwrap().solve_all().unwrap();
    assert!(trace.converged());
    let phases = trace.states().iter().map(HungarianState::phase).collect::<Vec<_>>();
    assert_eq!(phases[0], Phase::ReduceRows);
    assert!(phases.contains(&Phase::AdjustMatrix));

    let last = trace.final_state();
    assert_eq!(last.status(), Progress::Complete);
    assert_is_permutation(last);
    assert_eq!(last.total_cost(), brute_force(&problem()));
    assert_eq!(last.total_cost(), 140_f64);

    let pairs = last.assignments().iter()
        .map(|assignment| (
            last.problem().row_labels[assignment.row].as_str(),
            last.problem().column_labels[assignment.column].as_str(),
        ))
        .sorted()
        .collect::<Vec<_>>();
    assert_eq!(pairs, vec![("Ann", "Pipe"), ("Bob", "Wire"), ("Cas", "Paint"), ("Dee", "Tile")]);
}

#[test]
fn maximize() {
    let mut problem = problem();
    problem.is_maximization = true;

    let trace = initialize(&problem).unwrap().solve_all().unwrap();
    let last = trace.final_state();
    assert_is_permutation(last);
    assert_eq!(last.total_cost(), brute_force(&problem));
    assert_eq!(last.total_cost(), 344_f64);
    // Profits are reported in the original units
    let total = last.assignments().iter()
        .map(|assignment| last.original()[(assignment.row, assignment.column)])
        .sum::<f64>();
    assert_eq!(total, last.total_cost());
}
