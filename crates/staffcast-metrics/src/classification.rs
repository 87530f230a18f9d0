/// Fraction of predictions matching the true labels.
pub fn accuracy(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "label lengths differ");
    if y_true.is_empty() {
        return 0.0;
    }
    let hits = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t.round() == p.round())
        .count();
    hits as f64 / y_true.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_predictions_score_one() {
        let y = [0.0, 1.0, 1.0, 0.0];
        assert_relative_eq!(accuracy(&y, &y), 1.0);
    }

    #[test]
    fn half_right_scores_half() {
        let y_true = [0.0, 1.0, 1.0, 0.0];
        let y_pred = [0.0, 1.0, 0.0, 1.0];
        assert_relative_eq!(accuracy(&y_true, &y_pred), 0.5);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_relative_eq!(accuracy(&[], &[]), 0.0);
    }
}
