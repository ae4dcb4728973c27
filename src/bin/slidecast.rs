use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slidecast::timing::{align_slots, discover_narration, merged_output_path, parse_durations};
use slidecast::{
    Compositor, CompositorOpts, FfmpegEngine, MediaEngine, MergeRequest, NarrationSlot,
    SlideTiming, SlidecastError,
};

/// Used when a single narration file is given and the recording cannot be probed.
const FALLBACK_VIDEO_SECS: u32 = 300;

#[derive(Parser, Debug)]
#[command(name = "slidecast", version)]
struct Cli {
    /// Compositor options JSON (missing keys keep their defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path of the `ffmpeg` executable (overrides the config file).
    #[arg(long, global = true)]
    ffmpeg: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge narration into a silent screen recording.
    Fuse(FuseArgs),
    /// Print the merge plan for an already assembled narration track as JSON.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct FuseArgs {
    /// Silent screen recording.
    #[arg(long)]
    video: PathBuf,

    /// Narration: a directory of per-slide clips (sorted by name) or a single audio file.
    #[arg(long)]
    audio: PathBuf,

    /// Output path (default: `<video stem>_with_audio.<ext>` next to the recording).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Comma-separated slide durations in seconds, e.g. `5,3,4`. Required for a clip directory.
    #[arg(long)]
    durations: Option<String>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Silent screen recording.
    #[arg(long)]
    video: PathBuf,

    /// Assembled narration track.
    #[arg(long)]
    audio: PathBuf,

    /// Output path; its extension selects the container.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = load_opts(cli.config.as_deref(), cli.ffmpeg)?;
    match cli.cmd {
        Command::Fuse(args) => cmd_fuse(args, opts),
        Command::Plan(args) => cmd_plan(args, opts),
    }
}

fn load_opts(config: Option<&Path>, ffmpeg: Option<PathBuf>) -> anyhow::Result<CompositorOpts> {
    let mut opts = match config {
        Some(path) => CompositorOpts::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => CompositorOpts::default(),
    };
    if let Some(ffmpeg) = ffmpeg {
        opts.engine.ffmpeg_path = ffmpeg;
    }
    Ok(opts)
}

fn cmd_fuse(args: FuseArgs, opts: CompositorOpts) -> anyhow::Result<()> {
    let engine = FfmpegEngine::new(&opts.engine);
    engine.ensure_available()?;

    let out = args.out.unwrap_or_else(|| merged_output_path(&args.video));
    let (narration, durations) = if args.audio.is_dir() {
        narration_from_dir(&args.audio, args.durations.as_deref())?
    } else {
        let secs = match &args.durations {
            Some(text) => parse_durations(text)?,
            None => vec![whole_video_secs(&engine, &args.video)],
        };
        let slots = align_slots(vec![NarrationSlot::clip(&args.audio)], secs.len());
        (slots, secs)
    };

    let req = MergeRequest {
        video_path: args.video.clone(),
        narration,
        timings: SlideTiming::from_secs(&durations)?,
        output_path: out.clone(),
    };
    eprintln!(
        "merging {} narration slot(s) into {} (expected {} s)",
        req.narration.len(),
        args.video.display(),
        durations.iter().map(|&d| u64::from(d)).sum::<u64>()
    );

    let compositor = Compositor::new(engine, opts);
    match compositor.merge_narration(&req) {
        Ok(outcome) => {
            for w in &outcome.assembly.warnings {
                eprintln!("warning: {w}");
            }
            eprintln!("wrote {}", out.display());
            Ok(())
        }
        Err(e) => {
            report_failure(&e, &args.video);
            Err(e.into())
        }
    }
}

fn narration_from_dir(
    dir: &Path,
    durations: Option<&str>,
) -> anyhow::Result<(Vec<NarrationSlot>, Vec<u32>)> {
    let files = discover_narration(dir)?;
    if files.is_empty() {
        anyhow::bail!("no narration files (.mp3, .wav, .m4a) in '{}'", dir.display());
    }
    let Some(text) = durations else {
        anyhow::bail!("--durations is required when --audio is a directory");
    };
    let durations = parse_durations(text)?;
    if durations.len() < files.len() {
        anyhow::bail!(
            "{} narration files but only {} slide durations",
            files.len(),
            durations.len()
        );
    }
    let slots = files.into_iter().map(NarrationSlot::clip).collect();
    Ok((align_slots(slots, durations.len()), durations))
}

/// Whole seconds of the recording, or [`FALLBACK_VIDEO_SECS`] when it cannot be probed.
fn whole_video_secs(engine: &FfmpegEngine, video: &Path) -> u32 {
    match slidecast::probe::probe_metadata_duration(engine, video) {
        Ok(secs) => (secs.floor() as u32).max(1),
        Err(e) => {
            tracing::warn!(error = %e, fallback_secs = FALLBACK_VIDEO_SECS, "could not probe recording");
            FALLBACK_VIDEO_SECS
        }
    }
}

fn report_failure(err: &SlidecastError, video: &Path) {
    if let Some(diag) = err.diagnostics()
        && !diag.is_empty()
    {
        eprintln!("ffmpeg output:\n{diag}");
    }
    if matches!(
        err,
        SlidecastError::MergeFailed { .. } | SlidecastError::AssemblyFailed { .. }
    ) {
        eprintln!(
            "the original recording is unchanged at {}",
            video.display()
        );
    }
}

fn cmd_plan(args: PlanArgs, opts: CompositorOpts) -> anyhow::Result<()> {
    let engine = FfmpegEngine::new(&opts.engine);
    engine.ensure_available()?;
    let plan = slidecast::plan_merge(&engine, &args.video, &args.audio, &args.out, &opts)?;
    let json = serde_json::to_string_pretty(&plan).context("serialize merge plan")?;
    println!("{json}");
    eprintln!("command: ffmpeg {}", plan.invocation());
    Ok(())
}
