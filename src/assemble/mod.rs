//! Audio track assembly.
//!
//! Per-slide narration clips are padded, trimmed or replaced by silence so that segment `i` of
//! the output lasts exactly as long as slide `i`, then concatenated in slide order.

/// Per-slide segment decisions.
pub mod plan;
/// Filter graph construction and engine invocation.
pub mod track;

pub use plan::{PlannedSegment, SegmentPlan, plan_segments};
pub use track::{
    AssemblyGraph, AssemblyReport, TRACK_LABEL, assemble, assembly_invocation,
    build_assembly_graph, segment_label,
};

#[cfg(test)]
#[path = "../../tests/unit/assemble/mod.rs"]
mod tests;
