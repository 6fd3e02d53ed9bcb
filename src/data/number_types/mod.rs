//! # Number types
//!
//! Computations are done with `f64` values, compared against zero with a fixed tolerance. The cost
//! row of the Big M method needs a symbolic component on top of that, see `big_m`.
pub mod big_m;
