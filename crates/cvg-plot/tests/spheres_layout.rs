use cvg_metrics::{ConvergencePoint, ConvergenceThresholdMap};
use cvg_plot::{render_overlapping_svg, render_side_by_side_svg, spheres};

fn map() -> ConvergenceThresholdMap {
    ConvergenceThresholdMap {
        points: vec![
            ConvergencePoint {
                threshold: 0.2,
                budget: Some(25),
            },
            ConvergencePoint {
                threshold: 0.01,
                budget: None,
            },
        ],
    }
}

#[test]
fn unreached_thresholds_use_the_full_budget() {
    let balls = spheres(&map(), 100);
    assert_eq!(balls.len(), 3);
    assert_eq!(balls[0].label, "< 0.2");
    assert_eq!(balls[0].budget, 25);
    assert!(!balls[1].reached);
    assert_eq!(balls[1].budget, 100);
    assert_eq!(balls[2].label, "Total");
    assert_eq!(balls[2].color, "#000000");
}

#[test]
fn radius_scales_with_square_root_of_budget() {
    let balls = spheres(&map(), 100);
    let quarter = balls[0].radius(100);
    let full = balls[2].radius(100);
    assert!((full / quarter - 2.0).abs() < 1e-12);
}

#[test]
fn sphere_figures_are_deterministic() {
    let balls = spheres(&map(), 100);
    let a = render_overlapping_svg("Convergence Spheres (Overlapping) for smoke", &balls, 100);
    let b = render_overlapping_svg("Convergence Spheres (Overlapping) for smoke", &balls, 100);
    assert_eq!(a, b);
    assert_eq!(a.matches("fill-opacity='0.5'").count(), 3);

    let side = render_side_by_side_svg("side", &balls, 100);
    assert!(side.contains("&lt; 0.01"));
    assert!(side.contains("unreached"));
}
