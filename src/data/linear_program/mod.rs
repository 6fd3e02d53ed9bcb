//! # Representing linear programs
//!
//! Linear programs are entered as named variables with coefficients, see `problem`. The simplex
//! method standardizes them itself.
pub mod elements;
pub mod problem;
pub mod solution;
