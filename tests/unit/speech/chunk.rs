use super::*;
use crate::audio::wav::{WAV_HEADER_LEN, parse_wav_header};

#[test]
fn sentences_keep_terminators_and_spacing() {
    assert_eq!(
        split_sentences("Hi!  There. Is v1.2 out? yes"),
        ["Hi!  ", "There. ", "Is v1.2 out? ", "yes"]
    );
    assert_eq!(split_sentences("Done."), ["Done."]);
    assert!(split_sentences("").is_empty());
}

#[test]
fn chunks_close_once_lower_bound_is_reached() {
    let text = "one two three four. ".repeat(5);
    let chunks = split_into_chunks(&text, 10, 2);
    let counts: Vec<usize> = chunks.iter().map(|c| word_count(c)).collect();
    assert_eq!(counts, [8, 8, 4]);
    assert_eq!(chunks[0], "one two three four. one two three four.");
}

#[test]
fn oversized_sentence_gets_its_own_chunk() {
    let text = "a b. one two three four five six seven. c d.";
    let chunks = split_into_chunks(text, 4, 1);
    assert_eq!(
        chunks,
        ["a b.", "one two three four five six seven.", "c d."]
    );
}

#[test]
fn chunks_never_exceed_upper_bound_unless_single_sentence() {
    let text = "Short one. A somewhat longer sentence here. Tiny. \
                Another sentence with several words in it. End."
        .repeat(20);
    for chunk in split_into_chunks(&text, 20, 3) {
        let sentences = split_sentences(&chunk).len();
        assert!(word_count(&chunk) <= 23 || sentences == 1, "{chunk}");
    }
}

/// Two bytes of PCM per word.
#[derive(Default)]
struct FakeVoice {
    calls: Vec<String>,
    empty_on: Option<usize>,
}

impl SpeechSynthesizer for FakeVoice {
    fn synthesize(&mut self, text: &str, voice: &str) -> StoryreelResult<Vec<u8>> {
        assert_eq!(voice, "Algenib");
        self.calls.push(text.to_string());
        if self.empty_on == Some(self.calls.len()) {
            return Ok(Vec::new());
        }
        Ok(vec![self.calls.len() as u8; word_count(text) * 2])
    }
}

fn small_cfg() -> SpeechConfig {
    SpeechConfig {
        chunk_words: 10,
        chunk_tolerance: 2,
        ..SpeechConfig::default()
    }
}

#[test]
fn track_concatenates_pcm_under_one_header() {
    let text = "one two three four. ".repeat(5);
    let mut voice = FakeVoice::default();
    let track = synthesize_track(&mut voice, &text, &small_cfg()).unwrap();

    assert_eq!(voice.calls.len(), 3);
    let wav = track.wav().unwrap();
    assert_eq!(wav.len(), WAV_HEADER_LEN + 40);
    assert_eq!(&wav[WAV_HEADER_LEN..WAV_HEADER_LEN + 16], [1u8; 16]);
    assert_eq!(&wav[WAV_HEADER_LEN + 32..], [3u8; 8]);
    let info = parse_wav_header(&wav).unwrap();
    assert_eq!(info.sample_rate, 24_000);

    let parts = track.parts().unwrap();
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().all(|p| &p[0..4] == b"RIFF"));
}

#[test]
fn empty_audio_is_a_generation_error() {
    let mut voice = FakeVoice {
        empty_on: Some(2),
        ..FakeVoice::default()
    };
    let err = synthesize_track(&mut voice, &"w x y z. ".repeat(6), &small_cfg()).unwrap_err();
    assert!(matches!(
        err,
        StoryreelError::Generation {
            failure: GenerationFailure::EmptyResponse
        }
    ));
}

#[test]
fn blank_text_is_rejected() {
    let mut voice = FakeVoice::default();
    let err = synthesize_track(&mut voice, "   \n", &small_cfg()).unwrap_err();
    assert!(matches!(err, StoryreelError::Validation(_)));
    assert!(voice.calls.is_empty());
}

#[test]
fn track_files_are_named_after_voice() {
    let dir = tempfile::tempdir().unwrap();
    let mut voice = FakeVoice::default();
    let track = synthesize_track(&mut voice, "Hello there. General words.", &small_cfg()).unwrap();
    let written = track.write_to_dir(dir.path()).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["Algenib_part_1.wav", "Algenib_full.wav"]);
    assert!(written.iter().all(|p| p.is_file()));
}
