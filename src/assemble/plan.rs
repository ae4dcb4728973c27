use std::path::{Path, PathBuf};

use crate::config::ProbeOpts;
use crate::engine::MediaEngine;
use crate::foundation::core::{DURATION_MATCH_TOLERANCE_SEC, NarrationSlot, SlideTiming};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::probe::{DurationSource, probe_duration};

/// How one slide's slot of the narration track is produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentPlan {
    /// Narration already matches the slide duration.
    Copy {
        /// Narration clip.
        clip: PathBuf,
        /// Clip (and slide) duration.
        seconds: f64,
    },
    /// Narration is shorter than the slide; silence is appended after it.
    PadWithSilence {
        /// Narration clip.
        clip: PathBuf,
        /// Probed clip duration.
        clip_seconds: f64,
        /// Silence appended after the clip.
        pad_seconds: f64,
    },
    /// Narration overruns the slide and is cut to `[0, to_seconds]`.
    Trim {
        /// Narration clip.
        clip: PathBuf,
        /// Probed clip duration.
        clip_seconds: f64,
        /// Kept length (the slide duration).
        to_seconds: f64,
    },
    /// No narration; the slide plays over generated silence.
    Silence {
        /// Silence length (the slide duration).
        seconds: f64,
    },
}

impl SegmentPlan {
    /// Decide the segment for a slide of `target` seconds.
    ///
    /// `narration` is the clip and its probed duration, or `None` for an absent slot.
    pub fn decide(narration: Option<(&Path, f64)>, target: f64) -> Self {
        let Some((clip, clip_seconds)) = narration else {
            return Self::Silence { seconds: target };
        };
        let clip = clip.to_path_buf();
        if (clip_seconds - target).abs() <= DURATION_MATCH_TOLERANCE_SEC {
            Self::Copy {
                clip,
                seconds: target,
            }
        } else if clip_seconds < target {
            Self::PadWithSilence {
                clip,
                clip_seconds,
                pad_seconds: target - clip_seconds,
            }
        } else {
            Self::Trim {
                clip,
                clip_seconds,
                to_seconds: target,
            }
        }
    }

    /// Duration this segment occupies in the assembled track.
    pub fn target_seconds(&self) -> f64 {
        match self {
            Self::Copy { seconds, .. } => *seconds,
            Self::PadWithSilence {
                clip_seconds,
                pad_seconds,
                ..
            } => clip_seconds + pad_seconds,
            Self::Trim { to_seconds, .. } => *to_seconds,
            Self::Silence { seconds } => *seconds,
        }
    }

    /// Narration clip used by this segment.
    pub fn clip(&self) -> Option<&Path> {
        match self {
            Self::Copy { clip, .. } | Self::PadWithSilence { clip, .. } | Self::Trim { clip, .. } => {
                Some(clip)
            }
            Self::Silence { .. } => None,
        }
    }
}

/// A decided segment plus the provenance of the narration duration it was based on.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlannedSegment {
    /// Slide index.
    pub index: usize,
    /// Segment decision.
    pub plan: SegmentPlan,
    /// Where the narration duration came from (`None` for silence).
    pub duration_source: Option<DurationSource>,
}

/// Probe every narration clip and decide each slide's segment.
///
/// Narration that overruns its slide is trimmed and reported in the returned warnings; this
/// keeps the track aligned even when the caller did not lengthen the slide.
pub fn plan_segments<E: MediaEngine + ?Sized>(
    engine: &E,
    slots: &[NarrationSlot],
    timings: &[SlideTiming],
    probe: &ProbeOpts,
) -> SlidecastResult<(Vec<PlannedSegment>, Vec<String>)> {
    validate_inputs(slots, timings)?;

    let mut segments = Vec::with_capacity(timings.len());
    let mut warnings = Vec::new();
    for (slot, timing) in slots.iter().zip(timings) {
        let (plan, duration_source) = match slot.path() {
            None => (SegmentPlan::decide(None, timing.seconds), None),
            Some(clip) => {
                let probed = probe_duration(engine, clip, probe)?;
                (
                    SegmentPlan::decide(Some((clip, probed.seconds)), timing.seconds),
                    Some(probed.source),
                )
            }
        };

        match &plan {
            SegmentPlan::Trim {
                clip_seconds,
                to_seconds,
                ..
            } => {
                let msg = format!(
                    "slide {}: narration ({clip_seconds:.2}s) is longer than the slide ({to_seconds:.2}s); trimming to {to_seconds:.2}s",
                    timing.index + 1
                );
                tracing::warn!(slide = timing.index + 1, "{msg}");
                warnings.push(msg);
            }
            SegmentPlan::PadWithSilence {
                clip_seconds,
                pad_seconds,
                ..
            } => tracing::info!(
                slide = timing.index + 1,
                narration_sec = clip_seconds,
                target_sec = timing.seconds,
                pad_sec = pad_seconds,
                "padding narration with silence"
            ),
            SegmentPlan::Copy { .. } | SegmentPlan::Silence { .. } => tracing::debug!(
                slide = timing.index + 1,
                target_sec = timing.seconds,
                ?plan,
                "segment planned"
            ),
        }

        segments.push(PlannedSegment {
            index: timing.index,
            plan,
            duration_source,
        });
    }
    Ok((segments, warnings))
}

fn validate_inputs(slots: &[NarrationSlot], timings: &[SlideTiming]) -> SlidecastResult<()> {
    if timings.is_empty() {
        return Err(SlidecastError::validation(
            "at least one slide timing is required",
        ));
    }
    if slots.len() != timings.len() {
        return Err(SlidecastError::validation(format!(
            "narration slots ({}) and slide timings ({}) must have the same length",
            slots.len(),
            timings.len()
        )));
    }
    if let Some(bad) = timings
        .iter()
        .find(|t| !t.seconds.is_finite() || t.seconds <= 0.0)
    {
        return Err(SlidecastError::validation(format!(
            "slide {} duration must be positive, got {}",
            bad.index, bad.seconds
        )));
    }
    Ok(())
}
