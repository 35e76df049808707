use std::fmt::Write as _;

use cvg_core::Budget;
use cvg_metrics::ConvergenceThresholdMap;

use crate::figures::{escape, svg_open};

/// Fill colours from the loosest threshold to the "Total" sphere.
const PALETTE: [&str; 10] = [
    "#e3f2fd", "#bbdefb", "#90caf9", "#64b5f6", "#42a5f5", "#2196f3", "#1e88e5", "#1976d2",
    "#0d47a1", "#000000",
];

/// Area of the sphere drawn for the full budget, in square pixels.
const FULL_AREA: f64 = 8000.0;

/// One sphere: a threshold (or the total budget) and the budget it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Legend label, `< 0.01` or `Total`.
    pub label: String,
    /// Budget represented by the sphere.
    pub budget: Budget,
    /// Whether the threshold was reached; unreached ones show the full budget.
    pub reached: bool,
    /// Fill colour.
    pub color: &'static str,
}

impl Sphere {
    /// Radius with area proportional to `budget / estimated_models`.
    pub fn radius(&self, estimated_models: Budget) -> f64 {
        let total = estimated_models.max(1) as f64;
        (self.budget as f64 / total * FULL_AREA).sqrt()
    }
}

/// Builds one sphere per threshold plus a closing "Total" sphere.
pub fn spheres(convergence: &ConvergenceThresholdMap, estimated_models: Budget) -> Vec<Sphere> {
    let mut out: Vec<Sphere> = convergence
        .points
        .iter()
        .enumerate()
        .map(|(idx, point)| Sphere {
            label: format!("< {}", point.threshold),
            budget: point.budget.unwrap_or(estimated_models),
            reached: point.budget.is_some(),
            color: PALETTE[idx.min(PALETTE.len() - 2)],
        })
        .collect();
    out.push(Sphere {
        label: "Total".to_string(),
        budget: estimated_models,
        reached: true,
        color: PALETTE[PALETTE.len() - 1],
    });
    out
}

fn legend(svg: &mut String, spheres: &[Sphere], x: f64, y: f64) {
    for (idx, sphere) in spheres.iter().enumerate() {
        let row = y + idx as f64 * 14.0;
        let suffix = if sphere.reached { "" } else { ", unreached" };
        let _ = write!(
            svg,
            "<circle cx='{:.2}' cy='{:.2}' r='4' fill='{}' stroke='#6b7280' /><text x='{:.2}' y='{:.2}' font-size='10'>{} ({} models{})</text>",
            x,
            row,
            sphere.color,
            x + 8.0,
            row + 3.5,
            escape(&sphere.label),
            sphere.budget,
            suffix
        );
    }
}

/// Concentric spheres resting on a common baseline, largest drawn first.
pub fn render_overlapping_svg(title: &str, spheres: &[Sphere], estimated_models: Budget) -> String {
    let max_radius = spheres
        .iter()
        .map(|sphere| sphere.radius(estimated_models))
        .fold(1.0, f64::max)
        * 1.3;
    let legend_w = 170.0;
    let width = max_radius * 2.2 + legend_w;
    let height = max_radius * 2.2 + 40.0;
    let center_x = max_radius * 1.1;
    let baseline = height - 10.0;

    let mut svg = svg_open(width, height);
    let _ = write!(
        svg,
        "<text x='{:.2}' y='20' font-size='14' font-weight='bold'>{}</text>",
        10.0,
        escape(title)
    );
    for sphere in spheres.iter().rev() {
        let radius = sphere.radius(estimated_models);
        let _ = write!(
            svg,
            "<circle cx='{:.2}' cy='{:.2}' r='{:.2}' fill='{}' fill-opacity='0.5' />",
            center_x,
            baseline - radius,
            radius,
            sphere.color
        );
    }
    legend(&mut svg, spheres, width - legend_w + 10.0, 40.0);
    svg.push_str("</svg>");
    svg
}

/// Spheres in a row, one per threshold, labelled underneath.
pub fn render_side_by_side_svg(title: &str, spheres: &[Sphere], estimated_models: Budget) -> String {
    let max_radius = spheres
        .iter()
        .map(|sphere| sphere.radius(estimated_models))
        .fold(1.0, f64::max);
    let spacing = max_radius * 2.5;
    let legend_w = 170.0;
    let row_w = spacing * spheres.len().max(1) as f64;
    let width = row_w + legend_w;
    let height = (max_radius * 2.2 + 60.0).max(spheres.len() as f64 * 14.0 + 50.0);
    let baseline = height - 30.0;

    let mut svg = svg_open(width, height);
    let _ = write!(
        svg,
        "<text x='{:.2}' y='20' font-size='14' font-weight='bold'>{}</text>",
        10.0,
        escape(title)
    );
    for (idx, sphere) in spheres.iter().enumerate() {
        let radius = sphere.radius(estimated_models);
        let cx = max_radius + idx as f64 * spacing;
        let _ = write!(
            svg,
            "<circle cx='{:.2}' cy='{:.2}' r='{:.2}' fill='{}' fill-opacity='0.9' stroke='#6b7280' /><text x='{:.2}' y='{:.2}' text-anchor='middle' font-size='10'>{}</text>",
            cx,
            baseline - radius,
            radius,
            sphere.color,
            cx,
            baseline + 16.0,
            escape(&sphere.label)
        );
    }
    legend(&mut svg, spheres, row_w + 10.0, 40.0);
    svg.push_str("</svg>");
    svg
}
