use std::path::{Path, PathBuf};

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Narration and target durations closer than this are treated as equal.
pub const DURATION_MATCH_TOLERANCE_SEC: f64 = 0.001;

/// Allowed drift between the declared total slide time and the assembled track.
pub const TRACK_TOLERANCE_SEC: f64 = 0.1;

/// Declared on-screen duration of one slide.
///
/// Timing lists are ordered: position in the list is presentation order and temporal order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideTiming {
    /// 0-based slide index.
    pub index: usize,
    /// Target display duration in seconds (always `> 0`).
    pub seconds: f64,
}

impl SlideTiming {
    /// Create a validated timing with a finite, strictly positive duration.
    pub fn new(index: usize, seconds: f64) -> SlidecastResult<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(SlidecastError::validation(format!(
                "slide {index} duration must be a positive number of seconds, got {seconds}"
            )));
        }
        Ok(Self { index, seconds })
    }

    /// Build an ordered timing list from whole-second durations.
    pub fn from_secs(secs: &[u32]) -> SlidecastResult<Vec<Self>> {
        secs.iter()
            .enumerate()
            .map(|(index, &s)| Self::new(index, f64::from(s)))
            .collect()
    }
}

/// Sum of all target durations.
pub fn total_seconds(timings: &[SlideTiming]) -> f64 {
    timings.iter().map(|t| t.seconds).sum()
}

/// Optional narration clip for one slide.
///
/// An absent slot is valid and means the slide plays in silence.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NarrationSlot(Option<PathBuf>);

impl NarrationSlot {
    /// A slot without narration.
    pub fn absent() -> Self {
        Self(None)
    }

    /// A slot narrated by the audio file at `path`.
    pub fn clip(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    /// Path of the narration clip, if present.
    pub fn path(&self) -> Option<&Path> {
        self.0.as_deref()
    }

    /// Return `true` when the slide has no narration.
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<PathBuf>> for NarrationSlot {
    fn from(value: Option<PathBuf>) -> Self {
        Self(value)
    }
}

impl From<&str> for NarrationSlot {
    /// Empty strings map to an absent slot.
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::absent()
        } else {
            Self::clip(value)
        }
    }
}

/// Render seconds the way the engine's argument grammar expects them (millisecond precision).
pub(crate) fn fmt_secs(seconds: f64) -> String {
    format!("{seconds:.3}")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
