//! # Reading of problem files
//!
//! Linear programs can be read from the textual format of the `lp` module or from JSON. Transportation
//! and assignment problems are read from JSON records.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;

use crate::algorithm::SolveError;
use crate::data::assignment::AssignmentProblem;
use crate::data::linear_program::problem::LinearProgram;
use crate::data::transportation::TransportationProblem;
use crate::io::error::{ImportError, ParseError};

pub mod error;
pub mod lp;

/// A problem type that can be read from a file.
pub trait Import: DeserializeOwned {
    /// Check the consistency of a problem that was read successfully.
    ///
    /// # Errors
    ///
    /// A `SolveError::InvalidProblem` describing the inconsistency.
    fn validate(&self) -> Result<(), SolveError>;

    /// Extensions of files in a textual format, other than JSON.
    const TEXT_EXTENSIONS: &'static [&'static str] = &[];

    /// Parse the textual format.
    ///
    /// Only called for files with one of the `TEXT_EXTENSIONS`.
    fn parse_text(_program: &str) -> Result<Self, ParseError> {
        Err(ParseError::new("No textual format available for this problem type"))
    }
}

impl Import for LinearProgram {
    const TEXT_EXTENSIONS: &'static [&'static str] = &["lp", "txt"];

    fn validate(&self) -> Result<(), SolveError> {
        LinearProgram::validate(self)
    }

    fn parse_text(program: &str) -> Result<Self, ParseError> {
        lp::parse(program)
    }
}

impl Import for TransportationProblem {
    fn validate(&self) -> Result<(), SolveError> {
        TransportationProblem::validate(self)
    }
}

impl Import for AssignmentProblem {
    fn validate(&self) -> Result<(), SolveError> {
        AssignmentProblem::validate(self)
    }
}

/// Import a problem from a file.
///
/// The format is chosen by file extension: `json` for serialized problem records, or one of the
/// textual extensions of the problem type.
///
/// # Errors
///
/// When a file extension is unknown, a file cannot be found or read, the contents can't be parsed
/// etc. an error type is returned.
pub fn import<P: Import>(file_path: &Path) -> Result<P, ImportError> {
    // Open and read the file
    let mut program = String::new();
    File::open(file_path)
        .map_err(ImportError::IO)?
        .read_to_string(&mut program)
        .map_err(ImportError::IO)?;
    debug!("Read {} bytes from {:?}", program.len(), file_path);

    // Choose the right parser
    match file_path.extension() {
        Some(extension) => match extension.to_str() {
            Some(extension_string) => from_str(&program, extension_string),
            None => Err(ImportError::FileExtension(format!(
                "Could not convert OsStr to &str, probably invalid unicode: {:?}",
                extension
            ))),
        },
        None => Err(ImportError::FileExtension(format!(
            "Could not read extension from file path: {:?}",
            file_path
        ))),
    }
}

/// Read a problem from a string in the format belonging to `extension`.
///
/// # Errors
///
/// If the extension is not known for this problem type, the contents don't parse, or the problem
/// they describe is inconsistent.
pub fn from_str<P: Import>(program: &str, extension: &str) -> Result<P, ImportError> {
    let problem: P = if extension.eq_ignore_ascii_case("json") {
        serde_json::from_str(program).map_err(ImportError::Json)?
    } else if P::TEXT_EXTENSIONS.iter().any(|known| extension.eq_ignore_ascii_case(known)) {
        P::parse_text(program)?
    } else {
        return Err(ImportError::FileExtension(format!(
            "Could not recognise file extension \"{}\"",
            extension,
        )));
    };

    problem.validate()?;
    Ok(problem)
}
