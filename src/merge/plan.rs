use std::path::{Path, PathBuf};

use crate::config::{CompositorOpts, MergeOpts};
use crate::engine::ffmpeg::ensure_parent_dir;
use crate::engine::{Invocation, MediaEngine};
use crate::foundation::core::fmt_secs;
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::merge::codec::{AudioCodec, CodecFamily, Container, OutputVideoCodec, video_codec_for};
use crate::probe::{MediaProbe, ProbedDuration, probe_media};

/// Complete decision for muxing a recording with its narration track.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MergePlan {
    /// Recorded (silent) video.
    pub video_path: PathBuf,
    /// Assembled narration track.
    pub audio_path: PathBuf,
    /// Merged output.
    pub output_path: PathBuf,
    /// Output container.
    pub container: Container,
    /// Codec family detected in the recording.
    pub source_codec: CodecFamily,
    /// Probed recording duration.
    pub video_duration: ProbedDuration,
    /// Probed narration track duration.
    pub audio_duration: ProbedDuration,
    /// Whether the video stream must be re-encoded.
    pub needs_transcode: bool,
    /// Video codec choice.
    pub output_video_codec: OutputVideoCodec,
    /// Audio codec choice.
    pub output_audio_codec: AudioCodec,
    /// `video - audio` duration difference.
    pub start_delay_seconds: f64,
    /// Leading video cut from the recording (`0` when the drift is negligible).
    pub video_seek_seconds: f64,
    /// Move the MP4 index to the front (stream-copied `.mp4` outputs only).
    pub faststart: bool,
    /// Overwrite an existing output.
    pub overwrite: bool,
}

impl MergePlan {
    /// Engine arguments that perform this merge.
    ///
    /// Exactly one video stream (from the possibly seeked recording) and one audio stream (from
    /// the narration track) are mapped; the output ends with the shorter of the two.
    pub fn invocation(&self) -> Invocation {
        let mut inv = Invocation::new();
        inv.arg(if self.overwrite { "-y" } else { "-n" })
            .arg("-hide_banner");
        if self.video_seek_seconds > 0.0 {
            inv.arg("-ss").arg(fmt_secs(self.video_seek_seconds));
        }
        inv.arg("-i").arg(&self.video_path);
        inv.arg("-i").arg(&self.audio_path);
        inv.args(self.output_video_codec.args());
        inv.args(self.output_audio_codec.args());
        if self.faststart {
            inv.args(["-movflags", "+faststart"]);
        }
        inv.args(["-map", "0:v:0", "-map", "1:a:0", "-shortest"])
            .arg(&self.output_path);
        inv
    }

    /// Duration the merged file should have: the shorter of the remaining video and the audio.
    pub fn expected_output_seconds(&self) -> f64 {
        let video_left = (self.video_duration.seconds - self.video_seek_seconds).max(0.0);
        video_left.min(self.audio_duration.seconds)
    }
}

/// Leading video to cut for a `delay` of `video - audio` seconds.
///
/// Drift at or below `threshold` is imperceptible and not worth the precision risk of seeking.
pub fn seek_for_delay(delay: f64, threshold: f64) -> f64 {
    if delay > threshold { delay } else { 0.0 }
}

/// Derive the plan from already probed inputs. Pure: no engine calls.
pub fn derive_plan(
    video: &MediaProbe,
    audio: &MediaProbe,
    output: &Path,
    opts: &MergeOpts,
) -> MergePlan {
    let start_delay_seconds = video.duration.seconds - audio.duration.seconds;
    let video_seek_seconds = if video.duration.is_exact() && audio.duration.is_exact() {
        seek_for_delay(start_delay_seconds, opts.seek_threshold_sec)
    } else {
        // A size estimate for a video stream is far too coarse to cut frames by.
        if start_delay_seconds > opts.seek_threshold_sec {
            tracing::warn!(
                delay_sec = start_delay_seconds,
                "durations are estimates; not trimming the recording start"
            );
        }
        0.0
    };

    let container = Container::from_path(output);
    let source_codec = CodecFamily::detect(&video.diagnostics);
    let output_video_codec = video_codec_for(source_codec, container);
    let needs_transcode = output_video_codec.is_transcode();
    let recognized_mp4 = output
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Container::from_extension)
        == Some(Container::Mp4);

    MergePlan {
        video_path: video.path.clone(),
        audio_path: audio.path.clone(),
        output_path: output.to_path_buf(),
        container,
        source_codec,
        video_duration: video.duration,
        audio_duration: audio.duration,
        needs_transcode,
        output_video_codec,
        output_audio_codec: container.audio_codec(),
        start_delay_seconds,
        video_seek_seconds,
        faststart: recognized_mp4 && !needs_transcode,
        overwrite: opts.overwrite,
    }
}

/// Probe both inputs and plan the merge.
#[tracing::instrument(skip(engine, opts), fields(video = %video.display(), audio = %audio.display()))]
pub fn plan_merge<E: MediaEngine + ?Sized>(
    engine: &E,
    video: &Path,
    audio: &Path,
    output: &Path,
    opts: &CompositorOpts,
) -> SlidecastResult<MergePlan> {
    let video_probe = probe_media(engine, video, &opts.probe)?;
    let audio_probe = probe_media(engine, audio, &opts.probe)?;
    let plan = derive_plan(&video_probe, &audio_probe, output, &opts.merge);

    tracing::info!(
        video_sec = plan.video_duration.seconds,
        audio_sec = plan.audio_duration.seconds,
        delay_sec = plan.start_delay_seconds,
        seek_sec = plan.video_seek_seconds,
        source_codec = ?plan.source_codec,
        container = ?plan.container,
        transcode = plan.needs_transcode,
        "merge planned"
    );
    Ok(plan)
}

/// Run the merge described by `plan`.
///
/// On failure the engine diagnostics are attached and any partially written output is left where
/// it is; inputs are never modified.
#[tracing::instrument(skip(engine, plan), fields(output = %plan.output_path.display()))]
pub fn merge<E: MediaEngine + ?Sized>(engine: &E, plan: &MergePlan) -> SlidecastResult<()> {
    ensure_parent_dir(&plan.output_path)?;
    let out = engine.run(&plan.invocation()).map_err(|e| match e {
        e @ SlidecastError::ToolUnavailable(_) => e,
        other => SlidecastError::merge("failed to run ffmpeg merge", other.to_string()),
    })?;
    if !out.success {
        return Err(SlidecastError::merge(
            format!("ffmpeg merge exited with {}", out.status),
            out.diagnostics.trim(),
        ));
    }
    tracing::info!("merge finished");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/merge/plan.rs"]
mod tests;
