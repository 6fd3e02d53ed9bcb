//! # Problem data in memory
//!
//! This module provides the data structures used to represent problems in memory. Algorithms may
//! introduce their own intermediate structures, such as `algorithm::transportation::modi::ModiData`.
pub mod assignment;
pub mod linear_algebra;
pub mod linear_program;
pub mod number_types;
pub mod transportation;
