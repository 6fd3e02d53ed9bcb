//! # Linear algebra primitives
//!
//! Dense matrices, as all problems solved by this crate are small.
pub mod matrix;
