//! # Step by step optimization solvers
//!
//! Linear programs are solved with the (Big M) simplex method, transportation problems with the
//! northwest corner, least cost or Vogel's approximation method followed by the MODI method, and
//! assignment problems with the Hungarian method.
//!
//! Every solver is a state machine: `initialize` a problem, then call `Stepwise::step` to advance a
//! single unit of work, or `Stepwise::solve_all` to collect all states up to a terminal one.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod io;

#[cfg(test)]
mod tests;
