use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dense, row-major matrix of `f64` values.
///
/// This is the exchange type between the data, preprocessing, and model
/// crates. Rows are observations, columns are features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Creates a matrix from a flat row-major buffer.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> CoreResult<Self> {
        if data.len() != rows * cols {
            return Err(CoreError::DimensionMismatch(format!(
                "buffer of length {} cannot fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Creates a matrix of zeros with the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Builds a matrix from a slice of equally sized rows.
    ///
    /// An empty slice yields a 0x0 matrix. Ragged input is rejected.
    pub fn from_rows(rows: &[Vec<f64>]) -> CoreResult<Self> {
        if rows.is_empty() {
            return Ok(Self::zeros(0, 0));
        }
        let cols = rows[0].len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(CoreError::DimensionMismatch(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The underlying row-major buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// True when the matrix holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> CoreResult<f64> {
        if row >= self.rows {
            return Err(CoreError::RowOutOfBounds {
                row,
                rows: self.rows,
            });
        }
        if col >= self.cols {
            return Err(CoreError::ColumnOutOfBounds {
                col,
                cols: self.cols,
            });
        }
        Ok(self.data[row * self.cols + col])
    }

    /// Borrows one row as a contiguous slice.
    pub fn row(&self, row: usize) -> CoreResult<&[f64]> {
        if row >= self.rows {
            return Err(CoreError::RowOutOfBounds {
                row,
                rows: self.rows,
            });
        }
        let start = row * self.cols;
        Ok(&self.data[start..start + self.cols])
    }

    /// Copies one column into a fresh vector.
    pub fn col(&self, col: usize) -> CoreResult<Vec<f64>> {
        if col >= self.cols {
            return Err(CoreError::ColumnOutOfBounds {
                col,
                cols: self.cols,
            });
        }
        Ok((0..self.rows)
            .map(|r| self.data[r * self.cols + col])
            .collect())
    }

    /// Per-column arithmetic means.
    pub fn column_means(&self) -> CoreResult<Vec<f64>> {
        if self.rows == 0 {
            return Err(CoreError::EmptyMatrix);
        }
        let mut sums = vec![0.0; self.cols];
        for r in 0..self.rows {
            for c in 0..self.cols {
                sums[c] += self.data[r * self.cols + c];
            }
        }
        let n = self.rows as f64;
        Ok(sums.into_iter().map(|s| s / n).collect())
    }

    /// Per-column population standard deviations around the given means.
    pub fn column_stds(&self, means: &[f64]) -> CoreResult<Vec<f64>> {
        if self.rows == 0 {
            return Err(CoreError::EmptyMatrix);
        }
        if means.len() != self.cols {
            return Err(CoreError::DimensionMismatch(format!(
                "{} means supplied for {} columns",
                means.len(),
                self.cols
            )));
        }
        let mut sq = vec![0.0; self.cols];
        for r in 0..self.rows {
            for c in 0..self.cols {
                let d = self.data[r * self.cols + c] - means[c];
                sq[c] += d * d;
            }
        }
        let n = self.rows as f64;
        Ok(sq.into_iter().map(|s| (s / n).sqrt()).collect())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix({}x{})", self.rows, self.cols)?;
        for r in 0..self.rows.min(6) {
            let row = &self.data[r * self.cols..(r + 1) * self.cols];
            let cells: Vec<String> = row.iter().map(|v| format!("{v:.4}")).collect();
            writeln!(f, "  [{}]", cells.join(", "))?;
        }
        if self.rows > 6 {
            writeln!(f, "  ... {} more rows", self.rows - 6)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_checks_buffer_length() {
        assert!(Matrix::new(vec![1.0, 2.0, 3.0], 2, 2).is_err());
        assert!(Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).is_ok());
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, CoreError::DimensionMismatch(_)));
    }

    #[test]
    fn from_rows_empty_is_zero_by_zero() {
        let m = Matrix::from_rows(&[]).unwrap();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn get_row_col_accessors() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.get(1, 0).unwrap(), 3.0);
        assert_eq!(m.row(0).unwrap(), &[1.0, 2.0]);
        assert_eq!(m.col(1).unwrap(), vec![2.0, 4.0]);
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let m = Matrix::zeros(2, 2);
        assert_eq!(
            m.get(2, 0).unwrap_err(),
            CoreError::RowOutOfBounds { row: 2, rows: 2 }
        );
        assert_eq!(
            m.get(0, 5).unwrap_err(),
            CoreError::ColumnOutOfBounds { col: 5, cols: 2 }
        );
    }

    #[test]
    fn column_means_and_stds() {
        let m = Matrix::from_rows(&[vec![1.0, 10.0], vec![3.0, 10.0]]).unwrap();
        let means = m.column_means().unwrap();
        assert_relative_eq!(means[0], 2.0);
        assert_relative_eq!(means[1], 10.0);

        let stds = m.column_stds(&means).unwrap();
        assert_relative_eq!(stds[0], 1.0);
        // Constant column has zero spread.
        assert_relative_eq!(stds[1], 0.0);
    }

    #[test]
    fn column_means_on_empty_matrix_fails() {
        let m = Matrix::zeros(0, 0);
        assert_eq!(m.column_means().unwrap_err(), CoreError::EmptyMatrix);
    }
}
