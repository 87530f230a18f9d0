/// Mean squared error.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "target lengths differ");
    if y_true.is_empty() {
        return 0.0;
    }
    let sum: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| {
            let d = t - p;
            d * d
        })
        .sum();
    sum / y_true.len() as f64
}

/// Root mean squared error.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    mse(y_true, y_pred).sqrt()
}

/// R² (coefficient of determination); 0.0 when the targets are constant.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "target lengths differ");
    if y_true.is_empty() {
        return 0.0;
    }
    let n = y_true.len() as f64;
    let mean_true: f64 = y_true.iter().sum::<f64>() / n;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| {
            let d = t - p;
            d * d
        })
        .sum();
    let ss_tot: f64 = y_true
        .iter()
        .map(|t| {
            let d = t - mean_true;
            d * d
        })
        .sum();

    if ss_tot < 1e-15 {
        return 0.0;
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_predictions_have_zero_error() {
        let y = [1.0, 2.0, 3.0];
        assert_relative_eq!(mse(&y, &y), 0.0);
        assert_relative_eq!(rmse(&y, &y), 0.0);
        assert_relative_eq!(r2_score(&y, &y), 1.0);
    }

    #[test]
    fn constant_offset_error() {
        let y_true = [1.0, 2.0, 3.0];
        let y_pred = [2.0, 3.0, 4.0];
        assert_relative_eq!(mse(&y_true, &y_pred), 1.0);
        assert_relative_eq!(rmse(&y_true, &y_pred), 1.0);
    }

    #[test]
    fn predicting_the_mean_gives_zero_r2() {
        let y_true = [1.0, 2.0, 3.0];
        let y_pred = [2.0, 2.0, 2.0];
        assert_relative_eq!(r2_score(&y_true, &y_pred), 0.0);
    }

    #[test]
    fn constant_targets_define_r2_as_zero() {
        let y_true = [5.0, 5.0, 5.0];
        let y_pred = [5.0, 5.0, 5.0];
        assert_relative_eq!(r2_score(&y_true, &y_pred), 0.0);
    }
}
