//! # Algorithms
//!
//! Every algorithm in this crate is a finite state machine over immutable snapshots. A caller
//! creates an initial state with the `initialize` function of the algorithm's module and then
//! repeatedly calls `Stepwise::step`, which never modifies its input. Keeping the returned states
//! around gives a full history of the solution process.
use log::warn;
use serde::{Deserialize, Serialize};

pub use error::SolveError;

pub mod assignment;
pub mod error;
pub mod simplex;
pub mod transportation;

/// Tolerance used when comparing computed reals against zero.
pub const EPSILON: f64 = 1e-9;

/// Bounds on the amount of work done by `Stepwise::solve_all_with`.
///
/// The algorithms contain no cycle detection, a cap on the number of states is the safety net.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of states in a trace, including the state it started from.
    pub max_states: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_states: 100 }
    }
}

/// Progress of the transportation and assignment algorithms.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Progress {
    #[default]
    Initial,
    Running,
    Complete,
}

/// An algorithm state that can be advanced one unit of work at a time.
pub trait Stepwise: Clone {
    /// Compute the next state.
    ///
    /// Does not modify `self`. Calling this on a terminal state returns an identical state.
    ///
    /// # Errors
    ///
    /// Only when a precondition of the next unit of work doesn't hold, see `SolveError`.
    fn step(&self) -> Result<Self, SolveError>;

    /// Whether no further work can be done from this state.
    fn is_terminal(&self) -> bool;

    /// Step until a terminal state is reached, with the default `Limits`.
    ///
    /// # Errors
    ///
    /// The first error returned by `step`.
    fn solve_all(&self) -> Result<Trace<Self>, SolveError> {
        self.solve_all_with(&Limits::default())
    }

    /// Step until a terminal state is reached, or the trace has `limits.max_states` states.
    ///
    /// # Return value
    ///
    /// All states visited. The first one is a copy of `self`.
    ///
    /// # Errors
    ///
    /// The first error returned by `step`.
    fn solve_all_with(&self, limits: &Limits) -> Result<Trace<Self>, SolveError> {
        debug_assert!(limits.max_states > 0);

        let mut states = vec![self.clone()];
        let mut current = self.clone();
        while !current.is_terminal() && states.len() < limits.max_states {
            current = current.step()?;
            states.push(current.clone());
        }

        let trace = Trace { states };
        if !trace.converged() {
            warn!("Stopped after {} steps without reaching a terminal state", trace.nr_steps());
        }
        Ok(trace)
    }
}

/// The sequence of states produced by repeatedly stepping.
///
/// Always contains at least the state it started from.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace<S> {
    states: Vec<S>,
}

impl<S: Stepwise> Trace<S> {
    /// Whether the last state is terminal.
    ///
    /// If not, the step limit was reached and the last state must not be presented as a result.
    pub fn converged(&self) -> bool {
        self.final_state().is_terminal()
    }

    /// The last state computed.
    pub fn final_state(&self) -> &S {
        // A trace is never empty
        &self.states[self.states.len() - 1]
    }

    /// The terminal state, or the number of steps taken without reaching one.
    ///
    /// # Errors
    ///
    /// The number of steps done if the trace did not converge.
    pub fn outcome(&self) -> Result<&S, usize> {
        if self.converged() {
            Ok(self.final_state())
        } else {
            Err(self.nr_steps())
        }
    }

    /// All states, starting with the initial one.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Number of states in the trace.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// A trace always contains its initial state.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of transitions in the trace.
    pub fn nr_steps(&self) -> usize {
        self.states.len() - 1
    }
}
