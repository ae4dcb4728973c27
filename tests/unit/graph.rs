use super::*;

#[test]
fn filter_renders_positional_and_named_args() {
    assert_eq!(Filter::new("acopy").to_string(), "acopy");
    assert_eq!(
        Filter::new("atrim").positional(0).positional("4.000").to_string(),
        "atrim=0:4.000"
    );
    let f = Filter::new("anullsrc")
        .option("r", 44_100)
        .option("cl", "stereo")
        .option("d", "3.000");
    assert_eq!(f.to_string(), "anullsrc=r=44100:cl=stereo:d=3.000");
    assert_eq!(f.get("cl"), Some("stereo"));
    assert_eq!(f.get("n"), None);
}

#[test]
fn chain_renders_inputs_filters_outputs() {
    let chain = FilterChain::new()
        .input(StreamRef::input_audio(1))
        .filter(Filter::new("atrim").positional(0).positional("4.000"))
        .filter(Filter::new("asetpts").positional("PTS-STARTPTS"))
        .output("a2");
    assert_eq!(chain.to_string(), "[1:a]atrim=0:4.000,asetpts=PTS-STARTPTS[a2]");
    assert_eq!(chain.filter_names(), vec!["atrim", "asetpts"]);
    assert!(chain.find("asetpts").is_some());
}

#[test]
fn source_chain_has_no_input_pads() {
    let chain = FilterChain::new()
        .filter(Filter::new("anullsrc").option("d", "3.000"))
        .output("a1");
    assert_eq!(chain.to_string(), "anullsrc=d=3.000[a1]");
}

#[test]
fn graph_joins_chains_with_semicolons() {
    let mut graph = FilterGraph::new();
    graph.push(
        FilterChain::new()
            .input(StreamRef::input_audio(0))
            .filter(Filter::new("acopy"))
            .output("a0"),
    );
    graph.push(
        FilterChain::new()
            .input(StreamRef::label("a0"))
            .filter(
                Filter::new("concat")
                    .option("n", 1)
                    .option("v", 0)
                    .option("a", 1),
            )
            .output("out"),
    );
    assert_eq!(
        graph.render(),
        "[0:a]acopy[a0];[a0]concat=n=1:v=0:a=1[out]"
    );
    assert_eq!(graph.producer_of("out"), graph.chains.get(1));
    assert!(graph.producer_of("a9").is_none());
}
