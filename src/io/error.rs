//! # Error reporting for reading of problem files
//!
//! A collection of enums and structures describing any problems encountered during reading and
//! parsing.
use std::error::Error;
use std::fmt::{self, Display};
use std::io;

use crate::algorithm::SolveError;

/// An `ImportError` is created when an error was encountered during IO or parsing.
///
/// It is the highest error in the io error hierarchy.
#[derive(Debug)]
pub enum ImportError {
    /// The file extension of the provided file path is not known or supported.
    ///
    /// The contained `String` is a message for the end user.
    FileExtension(String),
    /// The file to read isn't found, or the reading of file couldn't start or was interrupted.
    IO(io::Error),
    /// Contents of a text file could not be parsed into a linear program.
    Parse(ParseError),
    /// Contents of a JSON file don't describe a problem record.
    Json(serde_json::Error),
    /// The file is well formed, but the problem it describes is inconsistent.
    ///
    /// For example, a cost matrix might not match the number of sources.
    Problem(SolveError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImportError::FileExtension(message) => message.fmt(f),
            ImportError::IO(error) => error.fmt(f),
            ImportError::Parse(error) => error.fmt(f),
            ImportError::Json(error) => write!(f, "JSON error: {}", error),
            ImportError::Problem(error) => error.fmt(f),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ImportError::FileExtension(_) => None,
            ImportError::IO(error) => Some(error),
            ImportError::Parse(error) => Some(error),
            ImportError::Json(error) => Some(error),
            ImportError::Problem(error) => Some(error),
        }
    }
}

impl From<ParseError> for ImportError {
    fn from(error: ParseError) -> Self {
        ImportError::Parse(error)
    }
}

impl From<SolveError> for ImportError {
    fn from(error: SolveError) -> Self {
        ImportError::Problem(error)
    }
}

/// A `ParseError` represents all errors encountered during parsing.
///
/// It may recursively hold more ParseErrors to provide more detail. At the end of this chain, there
/// may be a file location containing a line number and line, at which the error was caused.
#[derive(Debug, PartialEq)]
pub struct ParseError {
    description: String,
    source: Option<ParseErrorSource>,
}

/// A `ParseErrorSource` can be used with a `ParseError` to describe its cause.
///
/// It can be either a file line number and line contents, or another `ParseError` with its own
/// description and optionally, a cause.
#[derive(Debug, PartialEq)]
enum ParseErrorSource {
    FileLocation(u64, String),
    Nested(Box<ParseError>),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ParseError: {}", self.chain_description().join("\n"))
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Some(ParseErrorSource::Nested(ref error)) = self.source {
            Some(error.as_ref())
        } else { None }
    }
}

impl ParseError {
    /// Create a new `ParseError` with only a description.
    ///
    /// # Arguments
    ///
    /// * `description`: What's wrong at the moment of creation.
    ///
    /// # Return value
    ///
    /// * A `ParseError` instance without a cause.
    pub fn new(description: impl Into<String>) -> ParseError {
        ParseError { description: description.into(), source: None, }
    }

    /// Create a new `ParseError` instance with a `FileLocation` as a cause.
    ///
    /// # Arguments
    ///
    /// * `description`: What's wrong at the moment of creation.
    /// * `file_location`: A reference to a line number and line that caused the error.
    ///
    /// # Return value
    ///
    /// A new `ParseError` instance with a `FileLocation` cause.
    pub fn with_file_location(
        description: impl Into<String>,
        file_location: FileLocation,
    ) -> ParseError {
        let (line_number, line) = file_location;
        ParseError {
            description: description.into(),
            source: Some(ParseErrorSource::FileLocation(line_number, line.to_string())),
        }
    }

    /// Wrap a new `ParseError` around an existing one.
    ///
    /// # Arguments
    ///
    /// * `description`: What's wrong at the moment of creation.
    /// * `parse_error`: What caused this `ParseError`.
    ///
    /// # Return value
    ///
    /// A new `ParseError` instance with a `ParseError` cause.
    pub fn with_cause(description: impl Into<String>, parse_error: ParseError) -> ParseError {
        ParseError {
            description: description.into(),
            source: Some(ParseErrorSource::Nested(Box::new(parse_error))),
        }
    }

    /// Line number at which the error was caused, if known.
    pub fn line_number(&self) -> Option<u64> {
        match &self.source {
            Some(ParseErrorSource::FileLocation(line_number, _)) => Some(*line_number),
            Some(ParseErrorSource::Nested(error)) => error.line_number(),
            None => None,
        }
    }

    /// Get all descriptions in the chain, starting with this one.
    fn chain_description(&self) -> Vec<String> {
        let mut descriptions = vec![self.description.clone()];

        if let Some(ref source) = self.source {
            match source {
                ParseErrorSource::FileLocation(line_number, line) => {
                    descriptions.push(format!("\tCaused at line\t{}:\t{}", line_number, line));
                }
                ParseErrorSource::Nested(error) => {
                    descriptions.append(&mut error.chain_description());
                }
            }
        }

        descriptions
    }
}

/// A `FileLocation` references a line in the file by the line number of the file as originally
/// read from the disk. It contains a reference to the line itself.
pub(super) type FileLocation<'a> = (u64, &'a str);
