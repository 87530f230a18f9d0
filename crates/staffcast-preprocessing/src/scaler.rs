use staffcast_core::{CoreError, Matrix};
use thiserror::Error;

/// Errors raised while fitting or applying a scaler.
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("cannot fit a scaler on an empty matrix")]
    EmptyFit,

    #[error("scaler fitted on {expected} features, input has {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ScaleResult<T> = Result<T, ScaleError>;

/// Per-column standardization fitted on training data.
///
/// Applies `(x - mean) / std` with the fit-time column statistics, where
/// std is the population standard deviation. A column whose fit-time std
/// is zero transforms to exactly 0.0 for every input value; that collapse
/// is part of the contract.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Computes per-column mean and population std over the rows of `x`.
    pub fn fit(x: &Matrix) -> ScaleResult<Self> {
        if x.rows() == 0 {
            return Err(ScaleError::EmptyFit);
        }
        let means = x.column_means()?;
        let stds = x.column_stds(&means)?;
        Ok(Self { means, stds })
    }

    /// Fit-time column means.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Fit-time column population stds.
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    /// Standardizes a single row.
    pub fn transform_row(&self, row: &[f64]) -> ScaleResult<Vec<f64>> {
        if row.len() != self.means.len() {
            return Err(ScaleError::FeatureMismatch {
                expected: self.means.len(),
                got: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(&x, (&mean, &std))| if std == 0.0 { 0.0 } else { (x - mean) / std })
            .collect())
    }

    /// Standardizes every row of a matrix.
    pub fn transform(&self, x: &Matrix) -> ScaleResult<Matrix> {
        let mut rows = Vec::with_capacity(x.rows());
        for r in 0..x.rows() {
            rows.push(self.transform_row(x.row(r)?)?);
        }
        Ok(Matrix::from_rows(&rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fit_on_empty_matrix_fails() {
        let x = Matrix::zeros(0, 0);
        assert!(matches!(StandardScaler::fit(&x), Err(ScaleError::EmptyFit)));
    }

    #[test]
    fn transform_of_fit_means_is_zero() {
        let x = Matrix::from_rows(&[
            vec![1.0, 200.0, -3.0],
            vec![5.0, 100.0, 9.0],
            vec![3.0, 300.0, 0.0],
        ])
        .unwrap();
        let scaler = StandardScaler::fit(&x).unwrap();
        let out = scaler.transform_row(scaler.means()).unwrap();
        for v in out {
            assert_relative_eq!(v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn transformed_columns_have_unit_variance() {
        let x = Matrix::from_rows(&[vec![2.0], vec![4.0], vec![6.0], vec![8.0]]).unwrap();
        let scaler = StandardScaler::fit(&x).unwrap();
        let out = scaler.transform(&x).unwrap();
        let means = out.column_means().unwrap();
        let stds = out.column_stds(&means).unwrap();
        assert_relative_eq!(means[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(stds[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_column_collapses_to_zero_for_any_input() {
        let x = Matrix::from_rows(&[vec![7.0, 1.0], vec![7.0, 2.0], vec![7.0, 3.0]]).unwrap();
        let scaler = StandardScaler::fit(&x).unwrap();
        assert_eq!(scaler.stds()[0], 0.0);

        for probe in [7.0, 0.0, -1e9, 3.5e12] {
            let out = scaler.transform_row(&[probe, 2.0]).unwrap();
            assert_eq!(out[0], 0.0);
        }
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let x = Matrix::from_rows(&[vec![1.0, 2.0]]).unwrap();
        let scaler = StandardScaler::fit(&x).unwrap();
        let err = scaler.transform_row(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::FeatureMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn matrix_transform_matches_row_transform() {
        let x = Matrix::from_rows(&[vec![1.0, 10.0], vec![3.0, 30.0], vec![5.0, 50.0]]).unwrap();
        let scaler = StandardScaler::fit(&x).unwrap();
        let all = scaler.transform(&x).unwrap();
        for r in 0..x.rows() {
            let row = scaler.transform_row(x.row(r).unwrap()).unwrap();
            assert_eq!(all.row(r).unwrap(), row.as_slice());
        }
    }
}
