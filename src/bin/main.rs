use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use log::info;
use serde::Serialize;

use stepwise_or::algorithm::{Limits, Stepwise, Trace};
use stepwise_or::algorithm::assignment::{self, HungarianState};
use stepwise_or::algorithm::simplex;
use stepwise_or::algorithm::transportation::{self, InitialMethod, TransportationState};
use stepwise_or::algorithm::transportation::modi::initialize_modi;
use stepwise_or::data::assignment::AssignmentProblem;
use stepwise_or::data::linear_program::problem::LinearProgram;
use stepwise_or::data::transportation::TransportationProblem;
use stepwise_or::io::import;

/// Step by step solvers for linear programs, transportation and assignment problems.
#[derive(Parser, Debug)]
#[command(version, author = "Bram van den Heuvel <bram@vandenheuvel.online>")]
struct Opts {
    #[command(subcommand)]
    problem: Problem,

    /// Maximum number of states per solver run, including the initial one
    #[arg(long, default_value = "100", global = true)]
    step_limit: usize,

    /// Print the explanation of every step
    #[arg(long, global = true)]
    trace: bool,

    /// Print the final state as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Problem {
    /// Solve a linear program with the (Big M) simplex method
    Lp {
        /// Problem file, `.lp` text or `.json`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Find an initial solution to a transportation problem and optionally improve it
    Transportation {
        /// Problem file, `.json`
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Method for the initial basic feasible solution
        #[arg(short, long, value_enum, default_value = "nwc")]
        method: MethodArg,

        /// Optimize the initial solution with the MODI method
        #[arg(short, long)]
        optimize: bool,
    },
    /// Solve an assignment problem with the Hungarian method
    Assignment {
        /// Problem file, `.json`
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum MethodArg {
    /// Northwest corner method
    Nwc,
    /// Least cost method
    Lcm,
    /// Vogel's approximation method
    Vam,
}

impl From<MethodArg> for InitialMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Nwc => InitialMethod::NorthwestCorner,
            MethodArg::Lcm => InitialMethod::LeastCost,
            MethodArg::Vam => InitialMethod::Vogel,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let opts = Opts::parse();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        },
    }
}

fn run(opts: &Opts) -> Result<(), Box<dyn Error>> {
    let limits = Limits { max_states: opts.step_limit.max(1) };

    match &opts.problem {
        Problem::Lp { file } => {
            info!("Reading problem file: {:?}", file);
            let problem: LinearProgram = import(file)?;
            let initial = simplex::initialize(&problem)?;
            println!("{}\n{}\n", initial.explanation(), initial.formulation());

            let trace = initial.solve_all_with(&limits)?;
            report(opts, &trace, simplex::explain)?;
            println!("{}", simplex::interpret_trace(&trace));
        },
        Problem::Transportation { file, method, optimize } => {
            info!("Reading problem file: {:?}", file);
            let problem: TransportationProblem = import(file)?;
            let initial = transportation::initialize(&problem, (*method).into())?;

            let trace = initial.solve_all_with(&limits)?;
            report(opts, &trace, |trace| explain(trace, TransportationState::explanation))?;
            let mut last = trace.outcome().map_err(stopped)?.clone();
            println!("{}: total cost {}", last.method(), last.total_cost());
            if last.degenerate() {
                println!("The initial solution is degenerate.");
            }

            if *optimize {
                let trace = initialize_modi(&last)?.solve_all_with(&limits)?;
                report(opts, &trace, |trace| explain(trace, TransportationState::explanation))?;
                last = trace.outcome().map_err(stopped)?.clone();
                println!("{}: total cost {}", last.method(), last.total_cost());
            }

            for allocation in last.allocations() {
                let cell = allocation.cell;
                println!(
                    "  {} -> {}: {}",
                    last.source_label(cell.row), last.destination_label(cell.column), allocation.value,
                );
            }
        },
        Problem::Assignment { file } => {
            info!("Reading problem file: {:?}", file);
            let problem: AssignmentProblem = import(file)?;
            let trace = assignment::initialize(&problem)?.solve_all_with(&limits)?;
            report(opts, &trace, |trace| explain(trace, HungarianState::explanation))?;

            let last = trace.outcome().map_err(stopped)?;
            println!("Total cost: {}", last.total_cost());
            for assignment in last.assignments() {
                println!(
                    "  {} -> {}",
                    last.problem().row_labels[assignment.row], last.problem().column_labels[assignment.column],
                );
            }
        },
    }

    Ok(())
}

/// Print the requested details of a trace.
fn report<S: Stepwise + Serialize>(
    opts: &Opts,
    trace: &Trace<S>,
    explain: impl Fn(&Trace<S>) -> String,
) -> Result<(), Box<dyn Error>> {
    if opts.trace {
        println!("{}", explain(trace));
    }
    if opts.json {
        println!("{}", serde_json::to_string_pretty(trace.final_state())?);
    }

    Ok(())
}

/// One explanation per line, prefixed with the step number.
fn explain<S: Stepwise>(trace: &Trace<S>, explanation: impl Fn(&S) -> &str) -> String {
    trace.states().iter()
        .enumerate()
        .map(|(i, state)| format!("[{}] {}", i, explanation(state)))
        .join("\n")
}

fn stopped(nr_steps: usize) -> String {
    format!("Stopped after {} steps without reaching a terminal state.", nr_steps)
}
