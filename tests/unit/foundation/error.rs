use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlidecastError::tool_unavailable("x")
            .to_string()
            .contains("tool unavailable:")
    );
    assert!(
        SlidecastError::probe("x", "")
            .to_string()
            .contains("probe error:")
    );
    assert!(
        SlidecastError::assembly("x", "")
            .to_string()
            .contains("assembly error:")
    );
    assert!(
        SlidecastError::merge("x", "")
            .to_string()
            .contains("merge error:")
    );
    assert!(
        SlidecastError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SlidecastError::not_found("/tmp/missing.mp3")
            .to_string()
            .contains("/tmp/missing.mp3")
    );
}

#[test]
fn diagnostics_are_exposed_for_engine_failures() {
    let err = SlidecastError::merge("ffmpeg exited with status 1", "Unknown encoder 'libvpx'");
    assert_eq!(err.diagnostics(), Some("Unknown encoder 'libvpx'"));
    assert!(!err.to_string().contains("libvpx"));

    assert_eq!(SlidecastError::validation("x").diagnostics(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlidecastError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
