use cvg_core::{Budget, MIN_BUDGET};
use serde::{Deserialize, Serialize};

/// Shape of the budget schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Number of evenly spaced samples of the normalized index.
    #[serde(default = "ScheduleSpec::default_points")]
    pub points: usize,
    /// Exponent applied to the normalized index before the geometric
    /// progression; values below one pack budgets near the low end.
    #[serde(default = "ScheduleSpec::default_warp_exponent")]
    pub warp_exponent: f64,
}

impl ScheduleSpec {
    const fn default_points() -> usize {
        40
    }

    const fn default_warp_exponent() -> f64 {
        0.5
    }
}

impl Default for ScheduleSpec {
    fn default() -> Self {
        Self {
            points: Self::default_points(),
            warp_exponent: Self::default_warp_exponent(),
        }
    }
}

/// Produces the strictly increasing budgets probed for an experiment.
///
/// Candidates are `2 * exp(t^w * ln(estimated_models / 2))` for `points`
/// evenly spaced `t` in `[0, 1]`, rounded half to even, de-duplicated, with
/// the endpoints pinned to 2 and `estimated_models`. Anything at or below
/// the minimum budget yields the single point schedule `[2]`.
pub fn generate_schedule(estimated_models: Budget, spec: &ScheduleSpec) -> Vec<Budget> {
    if estimated_models <= MIN_BUDGET {
        return vec![MIN_BUDGET];
    }
    let points = spec.points.max(2);
    let span = (estimated_models as f64 / MIN_BUDGET as f64).ln();
    let mut budgets: Vec<Budget> = (0..points)
        .map(|idx| {
            let t = idx as f64 / (points - 1) as f64;
            let candidate = MIN_BUDGET as f64 * (t.powf(spec.warp_exponent) * span).exp();
            candidate.round_ties_even() as Budget
        })
        .collect();
    budgets.sort_unstable();
    budgets.dedup();

    if let Some(first) = budgets.first_mut() {
        *first = MIN_BUDGET;
    }
    if let Some(last) = budgets.last_mut() {
        *last = estimated_models;
    }
    // Pinning can only collide with a neighbour through float noise at the
    // extremes; drop anything that broke strict ordering.
    budgets.dedup_by(|later, earlier| *later <= *earlier);
    if budgets.last() != Some(&estimated_models) {
        budgets.retain(|budget| *budget < estimated_models);
        budgets.push(estimated_models);
    }
    budgets
}
