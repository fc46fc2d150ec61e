use super::*;

struct StubGenerator {
    seen: Vec<ImageRequest>,
    reply: StoryreelResult<Vec<u8>>,
}

impl StubGenerator {
    fn replying(reply: StoryreelResult<Vec<u8>>) -> Self {
        Self {
            seen: Vec::new(),
            reply,
        }
    }
}

impl ImageGenerator for StubGenerator {
    fn generate(&mut self, req: &ImageRequest) -> StoryreelResult<Vec<u8>> {
        self.seen.push(req.clone());
        match &self.reply {
            Ok(bytes) => Ok(bytes.clone()),
            Err(StoryreelError::Generation { failure }) => {
                Err(StoryreelError::generation(failure.clone()))
            }
            Err(e) => panic!("unsupported stub reply: {e}"),
        }
    }
}

fn request(refs: Vec<PathBuf>) -> ImageRequest {
    ImageRequest {
        prompt: "a lighthouse at dusk".to_string(),
        reference_images: refs,
        aspect_ratio: AspectRatio::default(),
        model: DEFAULT_MODEL.to_string(),
    }
}

#[test]
fn writes_bytes_and_drops_missing_references() {
    let dir = tempfile::tempdir().unwrap();
    let style = dir.path().join("style.png");
    std::fs::write(&style, b"png").unwrap();
    let gone = dir.path().join("gone.png");
    let out = dir.path().join("generations/shot_01.png");

    let mut g = StubGenerator::replying(Ok(b"\x89PNG".to_vec()));
    let written = generate_to_file(&mut g, &request(vec![style.clone(), gone]), &out).unwrap();

    assert_eq!(written, out);
    assert_eq!(std::fs::read(&out).unwrap(), b"\x89PNG");
    assert_eq!(g.seen[0].reference_images, [style]);
}

#[test]
fn safety_rejection_stays_distinct_from_transport() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("shot_02.png");

    let mut g = StubGenerator::replying(Err(StoryreelError::generation(
        GenerationFailure::SafetyFilter {
            reason: "IMAGE_SAFETY".to_string(),
        },
    )));
    let err = generate_to_file(&mut g, &request(Vec::new()), &out).unwrap_err();
    assert!(matches!(
        err,
        StoryreelError::Generation {
            failure: GenerationFailure::SafetyFilter { .. }
        }
    ));
    assert!(err.to_string().contains("safety filter"));
    assert!(!out.exists());

    let mut g = StubGenerator::replying(Err(StoryreelError::generation(
        GenerationFailure::Transport("connection reset".to_string()),
    )));
    let err = generate_to_file(&mut g, &request(Vec::new()), &out).unwrap_err();
    assert!(matches!(
        err,
        StoryreelError::Generation {
            failure: GenerationFailure::Transport(_)
        }
    ));
}

#[test]
fn empty_reply_is_an_empty_response() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("shot_03.png");
    let mut g = StubGenerator::replying(Ok(Vec::new()));
    let err = generate_to_file(&mut g, &request(Vec::new()), &out).unwrap_err();
    assert!(matches!(
        err,
        StoryreelError::Generation {
            failure: GenerationFailure::EmptyResponse
        }
    ));
    assert!(!out.exists());
}

#[test]
fn references_fall_back_to_known_extensions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hero.webp"), b"x").unwrap();
    std::fs::write(dir.path().join("map.png"), b"x").unwrap();
    let refs = resolve_reference_images(" map.png, hero.jpg ,, ghost.png", dir.path());
    assert_eq!(
        refs,
        [dir.path().join("map.png"), dir.path().join("hero.webp")]
    );
}

#[test]
fn prompts_lose_markdown() {
    assert_eq!(
        clean_prompt("**Wide shot**<br>fog rolling in"),
        "Wide shot\nfog rolling in"
    );
}

#[test]
fn shot_selection_accepts_ids_and_ranges() {
    let sel = parse_shot_selection("1, 5-3,12").unwrap();
    assert_eq!(
        sel.into_iter().collect::<Vec<_>>(),
        ["01", "03", "04", "05", "12"]
    );
    assert!(parse_shot_selection("2-x").is_err());
}

#[test]
fn aspect_ratios_parse() {
    assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Portrait);
    assert_eq!(AspectRatio::default().to_string(), "16:9");
    assert!(matches!(
        "21:9".parse::<AspectRatio>(),
        Err(StoryreelError::Format(_))
    ));
}

#[test]
fn plan_targets_default_generation_paths() {
    let json = r#"[
        {"scene": "1", "image_prompt": "**Dawn**", "reference_images": "style.png"},
        {"scene": "2"},
        {"scene": "3", "image_prompt": "Dusk", "image": "custom/dusk.png"}
    ]"#;
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join(PICTURES_DIR)).unwrap();
    std::fs::write(dir.path().join("pictures/style.png"), b"x").unwrap();
    let scenario = Scenario::from_json_str(json, dir.path()).unwrap();

    let plan = plan_generations(&scenario, None, AspectRatio::Landscape, DEFAULT_MODEL);
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].shot_id, "01");
    assert_eq!(plan[0].request.prompt, "Dawn");
    assert_eq!(
        plan[0].request.reference_images,
        [dir.path().join("pictures/style.png")]
    );
    assert_eq!(plan[0].output, dir.path().join("generations/shot_01.png"));
    assert_eq!(plan[1].output, dir.path().join("custom/dusk.png"));

    let only_three = parse_shot_selection("3").unwrap();
    let plan = plan_generations(&scenario, Some(&only_three), AspectRatio::Square, "m");
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].shot_id, "03");
}
