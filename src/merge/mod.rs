//! Merging the narration track with the screen recording.
//!
//! Planning is separated from execution: [`plan_merge`] probes the inputs and returns a
//! [`MergePlan`] (codec choices, start alignment, stream mapping), [`merge`] runs it.

/// Codec/container compatibility.
pub mod codec;
/// Merge planning and execution.
pub mod plan;

pub use codec::{AudioCodec, CodecFamily, Container, OutputVideoCodec, VideoEncoder, video_codec_for};
pub use plan::{MergePlan, derive_plan, merge, plan_merge, seek_for_delay};
