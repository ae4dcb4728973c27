use super::*;

#[test]
fn builder_keeps_argument_order() {
    let mut inv = Invocation::new();
    inv.arg("-y").args(["-i", "a.mp3"]).args(["-i", "b.mp3"]);
    assert_eq!(inv.to_strings(), vec!["-y", "-i", "a.mp3", "-i", "b.mp3"]);
    assert_eq!(inv.values_of("-i"), vec!["a.mp3", "b.mp3"]);
    assert_eq!(inv.value_of("-i").as_deref(), Some("a.mp3"));
    assert_eq!(inv.value_of("-ss"), None);
    assert!(inv.contains("-y"));
    assert!(!inv.contains("-n"));
}

#[test]
fn display_quotes_graph_like_arguments() {
    let mut inv = Invocation::new();
    inv.args(["-filter_complex", "[0:a]acopy[a0];[a0]concat=n=1:v=0:a=1[out]"]);
    inv.arg(Path::new("out dir/track.mp3"));
    assert_eq!(
        inv.to_string(),
        "-filter_complex '[0:a]acopy[a0];[a0]concat=n=1:v=0:a=1[out]' 'out dir/track.mp3'"
    );
}
