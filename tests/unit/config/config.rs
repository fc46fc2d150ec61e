use super::*;
use crate::effects::transitions::TransitionStyle;

#[test]
fn defaults_match_the_documented_constants() {
    let cfg = CompilerConfig::default();
    assert_eq!(cfg.fps, Fps::new(24, 1).unwrap());
    assert_eq!(cfg.resolution, Resolution::FULL_HD);
    assert_eq!(cfg.working_resolution().unwrap(), Resolution::new(3840, 2160).unwrap());
    assert_eq!(cfg.overlap_secs, 1.0);
    assert_eq!(cfg.zoom, ZoomBounds { min: 1.0, max: 1.1 });
    assert_eq!(cfg.effects.len(), 6);
    assert!(cfg.transitions.uses_blur_ramp());
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = CompilerConfig::from_json_str(
        r#"{ "overlap_secs": 0.5, "transitions": { "kind": "random", "styles": ["wipe_left"] } }"#,
    )
    .unwrap();
    assert_eq!(cfg.overlap_secs, 0.5);
    assert_eq!(
        cfg.transitions,
        TransitionPolicy::Random {
            styles: vec![TransitionStyle::WipeLeft]
        }
    );
    assert_eq!(cfg.fps, Fps::new(24, 1).unwrap());
    assert_eq!(cfg.encoder.crf, 23);
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        CompilerConfig::from_json_str("{ not json"),
        Err(StoryreelError::Serde(_))
    ));
}

#[test]
fn invalid_values_are_rejected() {
    let odd = CompilerConfig {
        resolution: Resolution::new(1921, 1080).unwrap(),
        ..CompilerConfig::default()
    };
    assert!(odd.validate().is_err());

    let no_overlap = CompilerConfig {
        overlap_secs: 0.0,
        ..CompilerConfig::default()
    };
    assert!(no_overlap.validate().is_err());

    let no_effects = CompilerConfig {
        effects: vec![],
        ..CompilerConfig::default()
    };
    assert!(no_effects.validate().is_err());

    assert!(CompilerConfig::from_json_str(r#"{ "supersample": 0 }"#).is_err());
}

#[test]
fn missing_config_file_is_a_missing_resource() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        CompilerConfig::from_json_path(&dir.path().join("nope.json")),
        Err(StoryreelError::MissingResource(_))
    ));
}

#[test]
fn config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reel.json");
    std::fs::write(&path, r#"{ "resolution": { "width": 1280, "height": 720 } }"#).unwrap();
    let cfg = CompilerConfig::from_json_path(&path).unwrap();
    assert_eq!(cfg.resolution, Resolution::new(1280, 720).unwrap());
}

#[test]
fn speech_defaults_validate() {
    let speech = SpeechConfig::default();
    assert_eq!(speech.chunk_words, 400);
    assert_eq!(speech.chunk_tolerance, 30);
    assert_eq!(speech.sample_rate, 24_000);
    assert!(speech.validate().is_ok());
    let bad = SpeechConfig {
        chunk_tolerance: 400,
        ..SpeechConfig::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn oversized_supersample_is_rejected() {
    assert!(matches!(
        CompilerConfig::from_json_str(r#"{ "supersample": 3000000 }"#),
        Err(StoryreelError::Validation(_))
    ));
    let cfg = CompilerConfig {
        supersample: u32::MAX,
        ..CompilerConfig::default()
    };
    assert!(cfg.working_resolution().is_err());
    assert!(cfg.validate().is_err());
}
