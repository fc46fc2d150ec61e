use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn offsets_are_cumulative_base_durations() {
    let d = [7.0, 6.0, 4.0, 15.0];
    let mut rng = StdRng::seed_from_u64(3);
    let ts = schedule_transitions(&d, 1.0, &TransitionPolicy::BlurDissolve, &mut rng).unwrap();
    assert_eq!(ts.len(), 3);
    let offsets: Vec<f64> = ts.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, [7.0, 13.0, 17.0]);
    assert!(ts.iter().all(|t| t.duration == 1.0));
    assert!(ts.iter().all(|t| t.style == TransitionStyle::Fade));
    assert_eq!(
        ts.iter().map(|t| t.boundary).collect::<Vec<_>>(),
        [0, 1, 2]
    );
}

#[test]
fn offsets_strictly_increase() {
    let d = [0.5, 0.25, 3.0, 0.1, 2.0];
    let mut rng = StdRng::seed_from_u64(9);
    let ts = schedule_transitions(&d, 0.2, &TransitionPolicy::random_all(), &mut rng).unwrap();
    assert!(ts.windows(2).all(|w| w[0].offset < w[1].offset));
}

#[test]
fn single_clip_schedules_nothing() {
    let mut rng = StdRng::seed_from_u64(0);
    let ts = schedule_transitions(&[5.0], 1.0, &TransitionPolicy::BlurDissolve, &mut rng).unwrap();
    assert!(ts.is_empty());
    let ts = schedule_transitions(&[], 1.0, &TransitionPolicy::BlurDissolve, &mut rng).unwrap();
    assert!(ts.is_empty());
}

#[test]
fn total_is_sum_plus_one_overlap() {
    assert_eq!(total_duration(&[7.0, 6.0, 4.0], 1.0), 18.0);
    assert_eq!(total_duration(&[2.5], 0.5), 3.0);
}

#[test]
fn seeded_random_styles_are_reproducible() {
    let d = [1.0; 12];
    let policy = TransitionPolicy::random_all();
    let a = schedule_transitions(&d, 1.0, &policy, &mut StdRng::seed_from_u64(77)).unwrap();
    let b = schedule_transitions(&d, 1.0, &policy, &mut StdRng::seed_from_u64(77)).unwrap();
    assert_eq!(a, b);
}
