//! # Dense matrices
//!
//! All algorithms in this crate work on small, fully populated tables. A row-major `Vec<Vec<f64>>`
//! with the elementary row operations is all that is needed.
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::ops::{Index, IndexMut};
use std::slice::Iter;

use itertools::{Itertools, repeat_n};
use serde::{Deserialize, Serialize};

/// Uses a `Vec<Vec<f64>>` as underlying data structure. Dimensions are fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    data: Vec<Vec<f64>>,
    nr_rows: usize,
    nr_columns: usize,
}

impl DenseMatrix {
    /// Create a `DenseMatrix` from the provided data.
    ///
    /// # Arguments
    ///
    /// * `data`: Rows of equal length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Self {
        let nr_rows = data.len();
        let nr_columns = data.first().map_or(0, Vec::len);
        debug_assert!(data.iter().all(|row| row.len() == nr_columns));

        Self { data, nr_rows, nr_columns }
    }

    /// Create a dense matrix of zeros of dimension `rows` x `columns`.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        let data = repeat_n(repeat_n(0_f64, columns).collect::<Vec<_>>(), rows).collect();
        Self { data, nr_rows: rows, nr_columns: columns }
    }

    /// Get all values in column `j` of this matrix.
    pub fn column(&self, j: usize) -> Vec<f64> {
        debug_assert!(j < self.nr_columns);

        self.data.iter().map(|row| row[j]).collect()
    }

    /// Get all values in row `i` of this matrix.
    pub fn row(&self, i: usize) -> &[f64] {
        debug_assert!(i < self.nr_rows);

        &self.data[i]
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> Iter<'_, Vec<f64>> {
        self.data.iter()
    }

    /// Multiply row `i` with a factor `factor`.
    pub fn multiply_row(&mut self, i: usize, factor: f64) {
        debug_assert!(i < self.nr_rows);

        for value in &mut self.data[i] {
            *value *= factor;
        }
    }

    /// Add a multiple of row `read_row` to row `write_row`.
    pub fn mul_add_rows(&mut self, read_row: usize, write_row: usize, factor: f64) {
        debug_assert!(read_row < self.nr_rows);
        debug_assert!(write_row < self.nr_rows);
        debug_assert_ne!(read_row, write_row);

        for j in 0..self.nr_columns {
            let value = self.data[read_row][j];
            self.data[write_row][j] += factor * value;
        }
    }

    /// Add `value` to every element of row `i`.
    pub fn add_to_row(&mut self, i: usize, value: f64) {
        debug_assert!(i < self.nr_rows);

        for element in &mut self.data[i] {
            *element += value;
        }
    }

    /// Add `value` to every element of column `j`.
    pub fn add_to_column(&mut self, j: usize, value: f64) {
        debug_assert!(j < self.nr_columns);

        for row in &mut self.data {
            row[j] += value;
        }
    }

    /// Smallest value in row `i`, if the row is not empty.
    pub fn row_minimum(&self, i: usize) -> Option<f64> {
        self.row(i).iter().copied().reduce(f64::min)
    }

    /// Smallest value in column `j`, if the column is not empty.
    pub fn column_minimum(&self, j: usize) -> Option<f64> {
        debug_assert!(j < self.nr_columns);

        self.data.iter().map(|row| row[j]).reduce(f64::min)
    }

    /// Largest value in the matrix, if it is not empty.
    pub fn maximum(&self) -> Option<f64> {
        self.data.iter().flatten().copied().reduce(f64::max)
    }

    /// Apply a function to every element, creating a new matrix.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let data = self.data.iter()
            .map(|row| row.iter().map(|&value| f(value)).collect())
            .collect();
        Self { data, nr_rows: self.nr_rows, nr_columns: self.nr_columns }
    }

    /// Get the data of this matrix.
    pub fn data(self) -> Vec<Vec<f64>> {
        self.data
    }

    /// Number of rows.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Number of columns.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        &self.data[i][j]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        &mut self.data[i][j]
    }
}

impl Display for DenseMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        for row in &self.data {
            writeln!(f, "{}", row.iter().map(|value| format!("{:>8}", value)).join(" "))?;
        }
        Ok(())
    }
}
