use thiserror::Error;

/// Errors raised by the matrix scaffolding shared across StaffCast crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("row {row} out of bounds for matrix with {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("column {col} out of bounds for matrix with {cols} columns")]
    ColumnOutOfBounds { col: usize, cols: usize },

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("empty matrix")]
    EmptyMatrix,
}

pub type CoreResult<T> = Result<T, CoreError>;
