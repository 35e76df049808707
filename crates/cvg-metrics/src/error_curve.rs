/// Lower bound of the relative error reference scale. Keeps the ratio from
/// blowing up when every approximation is already close to the truth.
pub const REL_ERROR_FLOOR: f64 = 0.01;

/// `|truth - approx|` per budget; NaN if either side is NaN.
pub fn absolute_errors(ground_truth: f64, probabilities: &[f64]) -> Vec<f64> {
    probabilities
        .iter()
        .map(|&approx| {
            if approx.is_nan() || ground_truth.is_nan() {
                f64::NAN
            } else {
                (ground_truth - approx).abs()
            }
        })
        .collect()
}

/// Midpoint between the largest absolute error and the error at the
/// smallest budget.
///
/// NaN errors are skipped when looking for the maximum. The result is NaN
/// if the curve is empty, fully NaN, or starts with a NaN.
pub fn reference_error(abs_errors: &[f64]) -> f64 {
    let max_error = abs_errors
        .iter()
        .copied()
        .filter(|err| !err.is_nan())
        .fold(None, |acc: Option<f64>, err| {
            Some(acc.map_or(err, |max| max.max(err)))
        })
        .unwrap_or(f64::NAN);
    let first_error = abs_errors.first().copied().unwrap_or(f64::NAN);
    (max_error + first_error) / 2.0
}

/// Absolute errors normalised by `max(REL_ERROR_FLOOR, reference_error)`.
///
/// A NaN reference falls back to the floor. Entries are NaN when the
/// absolute error is NaN or when the ground truth is NaN or exactly zero.
pub fn relative_errors(ground_truth: f64, abs_errors: &[f64]) -> Vec<f64> {
    let scale = reference_error(abs_errors).max(REL_ERROR_FLOOR);
    abs_errors
        .iter()
        .map(|&err| {
            if err.is_nan() || ground_truth.is_nan() || ground_truth == 0.0 {
                f64::NAN
            } else {
                err / scale
            }
        })
        .collect()
}
