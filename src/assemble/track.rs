use std::path::{Path, PathBuf};

use crate::assemble::plan::{PlannedSegment, SegmentPlan, plan_segments};
use crate::config::{AudioTrackOpts, CompositorOpts};
use crate::engine::ffmpeg::ensure_parent_dir;
use crate::engine::{Invocation, MediaEngine};
use crate::foundation::core::{
    NarrationSlot, SlideTiming, TRACK_TOLERANCE_SEC, fmt_secs, total_seconds,
};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::graph::{Filter, FilterChain, FilterGraph, StreamRef};
use crate::probe::{ProbedDuration, probe_duration};

/// Label of the concatenated track in the assembly graph.
pub const TRACK_LABEL: &str = "out";

/// Assembly filter graph plus the narration files it reads, in `-i` order.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyGraph {
    /// Narration inputs; input `k` of the graph is `inputs[k]`.
    pub inputs: Vec<PathBuf>,
    /// The graph.
    pub graph: FilterGraph,
}

/// Outcome of a successful assembly.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AssemblyReport {
    /// Assembled track.
    pub output: PathBuf,
    /// Per-slide decisions in slide order.
    pub segments: Vec<PlannedSegment>,
    /// Trim warnings (narration longer than its slide).
    pub warnings: Vec<String>,
    /// Declared total slide time.
    pub expected_seconds: f64,
    /// Duration of the written track, when it could be probed.
    pub measured: Option<ProbedDuration>,
}

/// Label of slide `i`'s segment.
pub fn segment_label(i: usize) -> String {
    format!("a{i}")
}

fn normalize(audio: &AudioTrackOpts) -> Filter {
    Filter::new("aformat")
        .option("sample_rates", audio.sample_rate)
        .option("channel_layouts", &audio.channel_layout)
}

/// Pad with silence to `seconds`, then cut there.
///
/// Every narration branch ends this way, so a probed clip duration that is off (VBR headers,
/// size estimates) still yields a segment of exactly the slide's length.
fn clamp_to(chain: FilterChain, seconds: f64) -> FilterChain {
    let target = fmt_secs(seconds);
    chain
        .filter(Filter::new("apad").option("whole_dur", &target))
        .filter(Filter::new("atrim").option("end", &target))
}

/// Build the graph that turns per-slide segments into one continuous track.
///
/// Every narration branch is normalized to the track's sample rate and channel layout so it
/// concatenates directly with generated silence. Segment `i` is labeled `a{i}`; the concatenation
/// is labeled [`TRACK_LABEL`].
pub fn build_assembly_graph(segments: &[SegmentPlan], audio: &AudioTrackOpts) -> AssemblyGraph {
    let mut inputs = Vec::new();
    let mut graph = FilterGraph::new();

    for (i, seg) in segments.iter().enumerate() {
        let chain = match seg {
            SegmentPlan::Silence { seconds } => FilterChain::new()
                .filter(
                    Filter::new("anullsrc")
                        .option("r", audio.sample_rate)
                        .option("cl", &audio.channel_layout),
                )
                .filter(Filter::new("atrim").option("duration", fmt_secs(*seconds))),
            SegmentPlan::Copy { clip, .. } | SegmentPlan::PadWithSilence { clip, .. } => {
                inputs.push(clip.clone());
                let chain = FilterChain::new()
                    .input(StreamRef::input_audio(inputs.len() - 1))
                    .filter(normalize(audio));
                clamp_to(chain, seg.target_seconds())
            }
            SegmentPlan::Trim {
                clip, to_seconds, ..
            } => {
                inputs.push(clip.clone());
                let chain = FilterChain::new()
                    .input(StreamRef::input_audio(inputs.len() - 1))
                    .filter(normalize(audio))
                    .filter(
                        Filter::new("atrim")
                            .option("start", 0)
                            .option("end", fmt_secs(*to_seconds)),
                    )
                    .filter(Filter::new("asetpts").positional("PTS-STARTPTS"));
                clamp_to(chain, *to_seconds)
            }
        };
        graph.push(chain.output(segment_label(i)));
    }

    let mut concat = FilterChain::new();
    for i in 0..segments.len() {
        concat = concat.input(StreamRef::label(segment_label(i)));
    }
    graph.push(
        concat
            .filter(
                Filter::new("concat")
                    .option("n", segments.len())
                    .option("v", 0)
                    .option("a", 1),
            )
            .output(TRACK_LABEL),
    );

    AssemblyGraph { inputs, graph }
}

/// Engine arguments that render `assembly` into `output`.
pub fn assembly_invocation(
    assembly: &AssemblyGraph,
    audio: &AudioTrackOpts,
    output: &Path,
    overwrite: bool,
) -> Invocation {
    let mut inv = Invocation::new();
    inv.arg(if overwrite { "-y" } else { "-n" })
        .arg("-hide_banner");
    for input in &assembly.inputs {
        inv.arg("-i").arg(input);
    }
    inv.arg("-filter_complex")
        .arg(assembly.graph.render())
        .arg("-map")
        .arg(format!("[{TRACK_LABEL}]"))
        .args(["-c:a", audio.codec.as_str(), "-b:a", audio.bitrate.as_str()])
        .arg(output);
    inv
}

/// Build one continuous narration track at `output` whose segment `i` lasts exactly
/// `timings[i].seconds`.
///
/// Any engine failure fails the whole assembly: a partially timed track would desynchronize
/// every later slide.
#[tracing::instrument(skip_all, fields(slides = timings.len(), output = %output.display()))]
pub fn assemble<E: MediaEngine + ?Sized>(
    engine: &E,
    slots: &[NarrationSlot],
    timings: &[SlideTiming],
    output: &Path,
    opts: &CompositorOpts,
) -> SlidecastResult<AssemblyReport> {
    let (segments, warnings) = plan_segments(engine, slots, timings, &opts.probe)?;
    let plans: Vec<SegmentPlan> = segments.iter().map(|s| s.plan.clone()).collect();
    let assembly = build_assembly_graph(&plans, &opts.audio);

    ensure_parent_dir(output)?;
    let inv = assembly_invocation(&assembly, &opts.audio, output, opts.merge.overwrite);
    let out = engine.run(&inv).map_err(|e| match e {
        e @ SlidecastError::ToolUnavailable(_) => e,
        other => SlidecastError::assembly(
            "failed to run ffmpeg audio concatenation",
            other.to_string(),
        ),
    })?;
    if !out.success {
        return Err(SlidecastError::assembly(
            format!("ffmpeg audio concatenation exited with {}", out.status),
            out.diagnostics.trim(),
        ));
    }

    let expected_seconds = total_seconds(timings);
    let measured = match probe_duration(engine, output, &opts.probe) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::debug!(error = %e, "could not probe assembled track");
            None
        }
    };
    if let Some(m) = measured
        && m.is_exact()
        && (m.seconds - expected_seconds).abs() > TRACK_TOLERANCE_SEC
    {
        tracing::warn!(
            expected_sec = expected_seconds,
            measured_sec = m.seconds,
            "assembled track length differs from total slide time"
        );
    }

    tracing::info!(
        expected_sec = expected_seconds,
        trimmed = warnings.len(),
        "narration track assembled"
    );
    Ok(AssemblyReport {
        output: output.to_path_buf(),
        segments,
        warnings,
        expected_seconds,
        measured,
    })
}
