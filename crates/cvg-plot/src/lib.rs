#![deny(missing_docs)]
#![doc = "Deterministic SVG figures for convergence experiments."]

/// Line charts over budgets.
pub mod figures;
/// Figure emission for a whole experiment.
pub mod render;
/// Convergence sphere diagrams.
pub mod spheres;

pub use figures::{render_line_chart_svg, FigureConfig, LineChart};
pub use render::{Renderer, SvgRenderer};
pub use spheres::{render_overlapping_svg, render_side_by_side_svg, spheres, Sphere};
