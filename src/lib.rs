//! Slidecast synchronizes per-slide narration with a silent screen recording of a presentation.
//!
//! A merge runs in two steps, both driven through an external media engine (`ffmpeg`):
//!
//! - Assemble one narration track whose segment `i` lasts exactly as long as slide `i`
//! - Merge that track with the recording, choosing codecs by container and aligning the start
//!
//! [`Compositor`] runs the whole pipeline for one [`MergeRequest`]; the modules below expose each
//! step on its own.
#![forbid(unsafe_code)]

mod foundation;

/// Audio track assembly.
pub mod assemble;
/// Compositor configuration.
pub mod config;
/// Media engine seam and the `ffmpeg` implementation.
pub mod engine;
/// Typed filter graphs.
pub mod graph;
/// Audio/video merge planning.
pub mod merge;
/// End-to-end pipeline.
pub mod pipeline;
/// Media duration probing.
pub mod probe;
/// Request-building helpers.
pub mod timing;

#[cfg(test)]
#[path = "../tests/unit/support/engine.rs"]
pub(crate) mod test_support;

pub use crate::foundation::core::{
    DURATION_MATCH_TOLERANCE_SEC, NarrationSlot, SlideTiming, TRACK_TOLERANCE_SEC, total_seconds,
};
pub use crate::foundation::error::{SlidecastError, SlidecastResult};

pub use crate::assemble::{AssemblyReport, SegmentPlan, assemble};
pub use crate::config::{AudioTrackOpts, CompositorOpts, EngineOpts, MergeOpts, ProbeOpts};
pub use crate::engine::ffmpeg::{FfmpegEngine, is_ffmpeg_on_path};
pub use crate::engine::{EngineOutput, Invocation, MediaEngine};
pub use crate::merge::{CodecFamily, Container, MergePlan, merge, plan_merge};
pub use crate::pipeline::{Compositor, MergeOutcome, MergeRequest, MergeStage};
pub use crate::probe::{DurationSource, ProbedDuration, probe_duration};
