use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn style_names_parse_with_aliases() {
    for style in TransitionStyle::ALL {
        assert_eq!(parse_transition_style(style.xfade_name()).unwrap(), style);
    }
    assert_eq!(
        parse_transition_style("slide_left").unwrap(),
        TransitionStyle::SlideLeft
    );
    assert_eq!(
        parse_transition_style("Cross-Fade").unwrap(),
        TransitionStyle::Fade
    );
    assert!(parse_transition_style("").is_err());
    assert!(parse_transition_style("pixelize").is_err());
}

#[test]
fn blur_dissolve_is_fixed_fade_and_uses_ramp() {
    let mut rng = StdRng::seed_from_u64(1);
    let policy = TransitionPolicy::default();
    assert!(policy.uses_blur_ramp());
    for _ in 0..10 {
        assert_eq!(policy.pick(&mut rng).unwrap(), TransitionStyle::Fade);
    }
}

#[test]
fn random_policy_draws_only_from_its_styles() {
    let mut rng = StdRng::seed_from_u64(42);
    let policy = TransitionPolicy::Random {
        styles: vec![TransitionStyle::WipeLeft, TransitionStyle::WipeRight],
    };
    assert!(!policy.uses_blur_ramp());
    for _ in 0..50 {
        let s = policy.pick(&mut rng).unwrap();
        assert!(matches!(
            s,
            TransitionStyle::WipeLeft | TransitionStyle::WipeRight
        ));
    }
}

#[test]
fn empty_random_policy_is_invalid() {
    let policy = TransitionPolicy::Random { styles: vec![] };
    assert!(policy.validate().is_err());
    assert!(policy.pick(&mut StdRng::seed_from_u64(0)).is_err());
}

#[test]
fn policy_round_trips_through_json_tag() {
    let json = serde_json::json!({ "kind": "random", "styles": ["fade", "slide_left"] });
    let policy: TransitionPolicy = serde_json::from_value(json).unwrap();
    assert_eq!(
        policy,
        TransitionPolicy::Random {
            styles: vec![TransitionStyle::Fade, TransitionStyle::SlideLeft]
        }
    );
    let fixed: TransitionPolicy =
        serde_json::from_value(serde_json::json!({ "kind": "blur_dissolve" })).unwrap();
    assert_eq!(fixed, TransitionPolicy::BlurDissolve);
}

#[test]
fn policy_strings() {
    assert_eq!(
        parse_transition_policy("Blur").unwrap(),
        TransitionPolicy::BlurDissolve
    );
    assert_eq!(
        "random".parse::<TransitionPolicy>().unwrap(),
        TransitionPolicy::random_all()
    );
    assert_eq!(
        parse_transition_policy("fade, wipe_right").unwrap(),
        TransitionPolicy::Random {
            styles: vec![TransitionStyle::Fade, TransitionStyle::WipeRight]
        }
    );
    assert!(parse_transition_policy("fade,,wipeleft").is_err());
}
