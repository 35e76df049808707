use std::f64::consts::E;

use cvg_core::Budget;

/// Compresses a relative error with `ln(err * (e - 1) + 1)`, mapping
/// `[0, 1]` onto `[0, 1]` while damping outliers above one.
pub fn rescale_error(rel_error: f64) -> f64 {
    (rel_error * (E - 1.0) + 1.0).ln()
}

/// Area under the rescaled relative error curve over `ln(budget)`.
///
/// Budgets whose rescaled error is NaN are dropped first. Fewer than two
/// remaining points yield NaN.
pub fn auec(budgets: &[Budget], rel_errors: &[f64]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = budgets
        .iter()
        .zip(rel_errors)
        .map(|(&budget, &err)| ((budget as f64).ln(), rescale_error(err)))
        .filter(|(_, y)| !y.is_nan())
        .unzip();
    if xs.len() < 2 {
        return f64::NAN;
    }
    trapezoid(&xs, &ys)
}

/// Trapezoidal quadrature of `ys` over `xs`.
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum()
}
