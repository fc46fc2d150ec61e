use super::*;

const UHD: Resolution = Resolution {
    width: 3840,
    height: 2160,
};

fn fps24() -> Fps {
    Fps::new(24, 1).unwrap()
}

fn path(effect: MotionEffect) -> MotionPath {
    motion_path(effect, 8.0, fps24(), ZoomBounds::default()).unwrap()
}

#[test]
fn every_effect_stays_in_bounds_at_every_frame() {
    let sources = [
        UHD,
        Resolution::new(1001, 777).unwrap(),
        Resolution::new(2, 2).unwrap(),
    ];
    let rates = [fps24(), Fps::new(30000, 1001).unwrap(), Fps::new(60, 1).unwrap()];
    for effect in MotionEffect::ALL {
        for fps in rates {
            for duration in [0.5, 4.0, 7.25, 16.0] {
                let p = motion_path(effect, duration, fps, ZoomBounds::default()).unwrap();
                for source in sources {
                    p.check_bounds(source).unwrap();
                }
            }
        }
    }
}

#[test]
fn total_frames_is_floor_of_duration_times_fps() {
    assert_eq!(path(MotionEffect::ZoomIn).total_frames, 192);
    let p = motion_path(
        MotionEffect::ZoomIn,
        7.0,
        Fps::new(30000, 1001).unwrap(),
        ZoomBounds::default(),
    )
    .unwrap();
    assert_eq!(p.total_frames, 209);
}

#[test]
fn zoom_in_ramps_between_bounds_and_stays_centered() {
    let p = path(MotionEffect::ZoomIn);
    let start = p.sample(0, UHD).unwrap();
    let end = p.sample(p.total_frames, UHD).unwrap();
    assert_eq!(start.zoom, 1.0);
    assert_eq!((start.x, start.y), (0.0, 0.0));
    assert!((end.zoom - 1.1).abs() < 1e-12);
    assert_eq!(end.x, end.margin(3840.0) / 2.0);
    assert_eq!(end.y, end.margin(2160.0) / 2.0);
}

#[test]
fn zoom_out_mirrors_zoom_in() {
    let p = path(MotionEffect::ZoomOut);
    assert!((p.sample(0, UHD).unwrap().zoom - 1.1).abs() < 1e-12);
    assert_eq!(p.sample(p.total_frames, UHD).unwrap().zoom, 1.0);
}

#[test]
fn pans_hold_max_zoom_and_sweep_edge_to_edge() {
    let left = path(MotionEffect::PanLeft);
    let a = left.sample(0, UHD).unwrap();
    let b = left.sample(left.total_frames, UHD).unwrap();
    assert_eq!(a.zoom, 1.1);
    assert_eq!(b.zoom, 1.1);
    assert_eq!(a.x, a.margin(3840.0));
    assert_eq!(b.x, 0.0);
    assert!(a.margin(3840.0) > 0.0);

    let right = path(MotionEffect::PanRight);
    let a = right.sample(0, UHD).unwrap();
    let b = right.sample(right.total_frames, UHD).unwrap();
    assert_eq!(a.x, 0.0);
    assert_eq!(b.x, b.margin(3840.0));
    assert_eq!(a.y, a.margin(2160.0) / 2.0);

    let up = path(MotionEffect::PanUp);
    let a = up.sample(0, UHD).unwrap();
    let b = up.sample(up.total_frames, UHD).unwrap();
    assert_eq!(a.y, a.margin(2160.0));
    assert_eq!(b.y, 0.0);
    assert_eq!(a.x, a.margin(3840.0) / 2.0);
}

#[test]
fn zoom_pan_right_starts_at_zero_margin() {
    let p = path(MotionEffect::ZoomPanRight);
    let a = p.sample(0, UHD).unwrap();
    assert_eq!(a.zoom, 1.0);
    assert_eq!(a.x, 0.0);
    let b = p.sample(p.total_frames, UHD).unwrap();
    assert_eq!(b.x, b.margin(3840.0));
    let mid = p.sample(p.total_frames / 2, UHD).unwrap();
    assert!(mid.x > 0.0 && mid.x < mid.margin(3840.0));
}

#[test]
fn offsets_are_monotonic_for_pans() {
    let p = path(MotionEffect::PanRight);
    let xs: Vec<f64> = (0..=p.total_frames)
        .map(|f| p.sample(f, UHD).unwrap().x)
        .collect();
    assert!(xs.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn sub_frame_duration_is_rejected() {
    assert!(motion_path(MotionEffect::ZoomIn, 0.01, fps24(), ZoomBounds::default()).is_err());
    assert!(motion_path(MotionEffect::ZoomIn, 0.0, fps24(), ZoomBounds::default()).is_err());
}

#[test]
fn invalid_zoom_bounds_are_rejected() {
    let below_one = ZoomBounds { min: 0.9, max: 1.1 };
    assert!(motion_path(MotionEffect::ZoomIn, 2.0, fps24(), below_one).is_err());
    let inverted = ZoomBounds { min: 1.2, max: 1.1 };
    assert!(motion_path(MotionEffect::ZoomIn, 2.0, fps24(), inverted).is_err());
}

#[test]
fn effect_names_parse_with_aliases() {
    for effect in MotionEffect::ALL {
        assert_eq!(parse_motion_effect(effect.name()).unwrap(), effect);
    }
    assert_eq!(
        parse_motion_effect("Zoom-In").unwrap(),
        MotionEffect::ZoomIn
    );
    assert_eq!(
        parse_motion_effect("zoom_pan_combo").unwrap(),
        MotionEffect::ZoomPanRight
    );
    assert!(parse_motion_effect("pan_down").is_err());
    assert!(parse_motion_effect("").is_err());
    assert!(parse_motion_effect("spin").is_err());
}
