//! # Integration tests that require a look inside the crate.
//!
//! One worked problem per file. Convention for function names:
//!
//! * `const *_LITERAL_STRING`: the problem as it is written in a file
//! * `fn linear_program()`, `fn problem()`: the parsed problem record
//! * a test per solver walking through every intermediate state
pub mod problem_3;
