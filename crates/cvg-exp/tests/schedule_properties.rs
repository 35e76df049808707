use cvg_exp::{generate_schedule, ScheduleSpec};
use proptest::prelude::*;

#[test]
fn degenerate_budgets_collapse_to_minimum() {
    let spec = ScheduleSpec::default();
    assert_eq!(generate_schedule(2, &spec), vec![2]);
    assert_eq!(generate_schedule(1, &spec), vec![2]);
    assert_eq!(generate_schedule(0, &spec), vec![2]);
}

#[test]
fn three_models_keep_both_endpoints() {
    assert_eq!(generate_schedule(3, &ScheduleSpec::default()), vec![2, 3]);
}

#[test]
fn large_budgets_use_every_point() {
    let schedule = generate_schedule(1_000_000, &ScheduleSpec::default());
    assert_eq!(schedule.len(), 40);
    assert_eq!(schedule[0], 2);
    assert_eq!(schedule[39], 1_000_000);
}

proptest! {
    #[test]
    fn schedule_is_strictly_increasing_between_endpoints(estimated in 2u64..5_000_000) {
        let schedule = generate_schedule(estimated, &ScheduleSpec::default());
        prop_assert!(!schedule.is_empty());
        prop_assert!(schedule.len() <= 40);
        prop_assert_eq!(schedule[0], 2);
        prop_assert_eq!(*schedule.last().unwrap(), estimated);
        prop_assert!(schedule.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn custom_shapes_respect_point_count(
        estimated in 3u64..100_000,
        points in 2usize..64,
        warp in 0.2f64..2.0,
    ) {
        let spec = ScheduleSpec { points, warp_exponent: warp };
        let schedule = generate_schedule(estimated, &spec);
        prop_assert!(schedule.len() <= points);
        prop_assert_eq!(schedule[0], 2);
        prop_assert_eq!(*schedule.last().unwrap(), estimated);
        prop_assert!(schedule.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
