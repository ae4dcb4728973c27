//! Helpers for callers that build merge requests: narration discovery, slot alignment and
//! slide-duration adjustments.

use std::path::{Path, PathBuf};

use crate::foundation::core::NarrationSlot;
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Narration file extensions picked up by [`discover_narration`] (compared case-insensitively).
pub const NARRATION_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];

/// A slide lengthened to fit its narration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlideExtension {
    /// 0-based slide index.
    pub index: usize,
    /// Declared duration.
    pub from_secs: u32,
    /// Lengthened duration.
    pub to_secs: u32,
}

/// Make `slots` exactly `slides` long.
///
/// Missing trailing slots become silent slides; surplus narration is dropped with a warning.
pub fn align_slots(mut slots: Vec<NarrationSlot>, slides: usize) -> Vec<NarrationSlot> {
    if slots.len() > slides {
        tracing::warn!(
            narration = slots.len(),
            slides,
            "more narration clips than slides; ignoring the extra clips"
        );
        slots.truncate(slides);
    }
    slots.resize_with(slides, NarrationSlot::absent);
    slots
}

/// Lengthen every slide whose narration runs longer than the slide.
///
/// Such a slide becomes `floor(narration) + 1` whole seconds, which leaves a short pause after
/// the narration and keeps the assembler from trimming it. `narration_secs[i]` is `None` for a
/// silent slide; entries past the end of `durations` are ignored.
pub fn accommodate_narration(
    durations: &mut [u32],
    narration_secs: &[Option<f64>],
) -> Vec<SlideExtension> {
    let mut extended = Vec::new();
    for (index, (slide, narration)) in durations.iter_mut().zip(narration_secs).enumerate() {
        let Some(secs) = *narration else {
            continue;
        };
        if !secs.is_finite() || secs <= f64::from(*slide) {
            continue;
        }
        let to_secs = (secs.floor() as u32).saturating_add(1);
        tracing::info!(
            slide = index + 1,
            from_secs = *slide,
            to_secs,
            "extending slide to fit narration"
        );
        extended.push(SlideExtension {
            index,
            from_secs: *slide,
            to_secs,
        });
        *slide = to_secs;
    }
    extended
}

/// Narration files in `dir`, sorted by file name.
///
/// Only regular files with a [`NARRATION_EXTENSIONS`] extension are returned; the name order is
/// taken as slide order, so `slide_01.mp3`-style names are expected.
pub fn discover_narration(dir: &Path) -> SlidecastResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SlidecastError::not_found(dir));
    }
    let entries = std::fs::read_dir(dir).map_err(|e| {
        anyhow::Error::new(e).context(format!("read narration dir '{}'", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(anyhow::Error::new)?.path();
        let is_narration = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                NARRATION_EXTENSIONS
                    .iter()
                    .any(|n| e.eq_ignore_ascii_case(n))
            });
        if is_narration && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Default output path for a narrated `recording`: `<stem>_with_audio.<ext>` beside it.
pub fn merged_output_path(recording: &Path) -> PathBuf {
    let stem = recording
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match recording.extension() {
        Some(ext) => format!("{stem}_with_audio.{}", ext.to_string_lossy()),
        None => format!("{stem}_with_audio"),
    };
    recording.with_file_name(name)
}

/// Parse a comma-separated list of whole, positive slide durations (`"5, 3,4"`).
pub fn parse_durations(text: &str) -> SlidecastResult<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, tok)| match tok.parse::<u32>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(SlidecastError::validation(format!(
                "duration {} ('{tok}') must be a positive whole number of seconds",
                i + 1
            ))),
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/timing.rs"]
mod tests;
