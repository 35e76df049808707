use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Canvas geometry shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Space reserved around the plot area for titles and labels.
    pub margin: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 384,
            margin: 48,
        }
    }
}

/// One polyline chart over budgets.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Title drawn above the plot area.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Plot the horizontal axis on a natural log scale.
    pub log_x: bool,
    /// Stroke colour of the series.
    pub color: &'static str,
    /// Label for the series legend.
    pub series_label: String,
    /// Data points; NaN coordinates break the line.
    pub points: Vec<(f64, f64)>,
    /// Optional dashed horizontal reference line.
    pub reference: Option<(String, f64)>,
}

pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub(crate) fn svg_open(width: f64, height: f64) -> String {
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}'>",
        width, height, width, height
    )
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

struct Axis {
    lo: f64,
    span: f64,
    start: f64,
    length: f64,
    flip: bool,
}

impl Axis {
    fn new(range: (f64, f64), start: f64, length: f64, flip: bool) -> Self {
        Self {
            lo: range.0,
            span: (range.1 - range.0).max(1e-9),
            start,
            length,
            flip,
        }
    }

    fn project(&self, value: f64) -> f64 {
        let fraction = (value - self.lo) / self.span;
        if self.flip {
            self.start + self.length * (1.0 - fraction)
        } else {
            self.start + self.length * fraction
        }
    }
}

/// Renders a chart as a standalone SVG document.
///
/// Output depends only on the inputs; identical charts produce identical
/// bytes.
pub fn render_line_chart_svg(chart: &LineChart, config: &FigureConfig) -> String {
    let width = config.width as f64;
    let height = config.height as f64;
    let margin = config.margin as f64;
    let plot_w = (width - 2.0 * margin).max(1.0);
    let plot_h = (height - 2.0 * margin).max(1.0);

    let to_x = |x: f64| if chart.log_x { x.ln() } else { x };
    let projected: Vec<Option<(f64, f64)>> = chart
        .points
        .iter()
        .map(|&(x, y)| {
            let x = to_x(x);
            (x.is_finite() && y.is_finite()).then_some((x, y))
        })
        .collect();

    let x_range = finite_range(projected.iter().flatten().map(|(x, _)| *x)).unwrap_or((0.0, 1.0));
    let y_values = projected
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .chain(chart.reference.as_ref().map(|(_, y)| *y));
    let (y_lo, y_hi) = finite_range(y_values).unwrap_or((0.0, 1.0));
    let pad = ((y_hi - y_lo) * 0.05).max(1e-6);
    let x_axis = Axis::new(x_range, margin, plot_w, false);
    let y_axis = Axis::new((y_lo - pad, y_hi + pad), margin, plot_h, true);

    let mut svg = svg_open(width, height);
    let _ = write!(
        svg,
        "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='none' stroke='#9ca3af' />",
        margin, margin, plot_w, plot_h
    );
    let _ = write!(
        svg,
        "<text x='{:.2}' y='{:.2}' text-anchor='middle' font-size='16' font-weight='bold'>{}</text>",
        width / 2.0,
        margin * 0.6,
        escape(&chart.title)
    );
    let _ = write!(
        svg,
        "<text x='{:.2}' y='{:.2}' text-anchor='middle' font-size='13'>{}</text>",
        width / 2.0,
        height - margin * 0.25,
        escape(&chart.x_label)
    );
    let _ = write!(
        svg,
        "<text x='{:.2}' y='{:.2}' text-anchor='middle' font-size='13' transform='rotate(-90 {:.2} {:.2})'>{}</text>",
        margin * 0.35,
        height / 2.0,
        margin * 0.35,
        height / 2.0,
        escape(&chart.y_label)
    );

    if let Some((label, value)) = &chart.reference {
        if value.is_finite() {
            let y = y_axis.project(*value);
            let _ = write!(
                svg,
                "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke='#dc2626' stroke-width='2' stroke-dasharray='6 4'><title>{}</title></line>",
                margin,
                y,
                margin + plot_w,
                y,
                escape(label)
            );
        }
    }

    // matplotlib style: NaN splits the series into separate segments.
    let mut segment: Vec<(f64, f64)> = Vec::new();
    let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
    for point in &projected {
        match point {
            Some((x, y)) => segment.push((x_axis.project(*x), y_axis.project(*y))),
            None if !segment.is_empty() => segments.push(std::mem::take(&mut segment)),
            None => {}
        }
    }
    if !segment.is_empty() {
        segments.push(segment);
    }
    for segment in &segments {
        let path = segment
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            svg,
            "<polyline points='{}' fill='none' stroke='{}' stroke-width='2' />",
            path, chart.color
        );
        for (x, y) in segment {
            let _ = write!(
                svg,
                "<circle cx='{:.2}' cy='{:.2}' r='3' fill='{}' />",
                x, y, chart.color
            );
        }
    }
    let _ = write!(
        svg,
        "<text x='{:.2}' y='{:.2}' text-anchor='end' font-size='12' fill='{}'>{}</text>",
        margin + plot_w - 6.0,
        margin + 16.0,
        chart.color,
        escape(&chart.series_label)
    );
    svg.push_str("</svg>");
    svg
}
