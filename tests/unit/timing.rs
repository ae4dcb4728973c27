use super::*;
use crate::test_support::touch;

#[test]
fn align_pads_with_silence_and_truncates_extras() {
    let slots = vec![NarrationSlot::from("a.mp3")];
    let aligned = align_slots(slots, 3);
    assert_eq!(aligned.len(), 3);
    assert_eq!(aligned[0].path(), Some(Path::new("a.mp3")));
    assert!(aligned[1].is_absent() && aligned[2].is_absent());

    let slots = vec![
        NarrationSlot::from("a.mp3"),
        NarrationSlot::from("b.mp3"),
        NarrationSlot::from("c.mp3"),
    ];
    let aligned = align_slots(slots, 2);
    assert_eq!(aligned.len(), 2);
    assert_eq!(aligned[1].path(), Some(Path::new("b.mp3")));
}

#[test]
fn slides_grow_to_fit_longer_narration() {
    let mut durations = vec![5, 3, 4, 2];
    let narration = [Some(4.0), None, Some(4.5), Some(7.0)];
    let extended = accommodate_narration(&mut durations, &narration);

    assert_eq!(durations, vec![5, 3, 5, 8]);
    assert_eq!(
        extended,
        vec![
            SlideExtension {
                index: 2,
                from_secs: 4,
                to_secs: 5,
            },
            SlideExtension {
                index: 3,
                from_secs: 2,
                to_secs: 8,
            },
        ]
    );
}

#[test]
fn exact_fit_is_left_alone() {
    let mut durations = vec![4];
    assert!(accommodate_narration(&mut durations, &[Some(4.0)]).is_empty());
    assert_eq!(durations, vec![4]);
}

#[test]
fn huge_narration_saturates_instead_of_overflowing() {
    let mut durations = vec![10];
    let extended = accommodate_narration(&mut durations, &[Some(1e12)]);
    assert_eq!(durations, vec![u32::MAX]);
    assert_eq!(extended[0].to_secs, u32::MAX);
}

#[test]
fn discovers_audio_files_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "slide_02.wav", 1);
    touch(dir.path(), "slide_10.M4A", 1);
    touch(dir.path(), "slide_01.mp3", 1);
    touch(dir.path(), "notes.txt", 1);
    std::fs::create_dir(dir.path().join("extra.mp3")).unwrap();

    let found = discover_narration(dir.path()).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["slide_01.mp3", "slide_02.wav", "slide_10.M4A"]);
}

#[test]
fn discovering_in_a_missing_dir_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = discover_narration(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, SlidecastError::NotFound(_)));
}

#[test]
fn merged_output_sits_next_to_recording() {
    assert_eq!(
        merged_output_path(Path::new("/tmp/rec/talk.webm")),
        PathBuf::from("/tmp/rec/talk_with_audio.webm")
    );
    assert_eq!(
        merged_output_path(Path::new("talk")),
        PathBuf::from("talk_with_audio")
    );
}

#[test]
fn parses_comma_separated_durations() {
    assert_eq!(parse_durations("5, 3,4").unwrap(), vec![5, 3, 4]);
    assert_eq!(parse_durations("12").unwrap(), vec![12]);
    for bad in ["", "5,,3", "5,0", "5,-1", "2.5"] {
        let err = parse_durations(bad).unwrap_err();
        assert!(matches!(err, SlidecastError::Validation(_)), "{bad}");
    }
}
