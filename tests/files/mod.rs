//! # Problem files
//!
//! Small problems in each of the supported file formats, read through `import` and solved to the
//! end.
use std::path::{Path, PathBuf};

/// # Reading and solving
mod test;

/// Relative path of the folder where the problem files are stored.
///
/// The path is relative to the project root folder.
fn problem_file_directory() -> PathBuf {
    Path::new(file!()).parent().unwrap().to_path_buf()
}

/// Compute the path of a problem file, based on its name and extension.
fn get_test_file_path(name: &str, extension: &str) -> PathBuf {
    problem_file_directory().join(name).with_extension(extension)
}
