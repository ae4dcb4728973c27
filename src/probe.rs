//! Media duration probing.
//!
//! Durations come from the engine's metadata dump (`Duration: HH:MM:SS.fraction`). When that
//! token is missing the prober falls back to a file-size estimate. The estimate assumes a fixed
//! byte rate and is only a rough guess: results carry [`DurationSource::SizeEstimate`] so callers
//! can tell.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::ProbeOpts;
use crate::engine::MediaEngine;
use crate::foundation::error::{SlidecastError, SlidecastResult};

static DURATION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration: (\d+):(\d{2}):(\d{2}(?:\.\d+)?)").expect("duration pattern is valid")
});

/// Where a probed duration came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    /// Parsed from the engine's metadata dump.
    Metadata,
    /// Estimated from file size; not exact.
    SizeEstimate,
}

/// A duration together with its provenance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProbedDuration {
    /// Duration in seconds.
    pub seconds: f64,
    /// How `seconds` was obtained.
    pub source: DurationSource,
}

impl ProbedDuration {
    /// Return `true` when the duration was read from metadata.
    pub fn is_exact(&self) -> bool {
        self.source == DurationSource::Metadata
    }
}

/// Probe result including the raw engine dump, reused for codec detection.
#[derive(Clone, Debug)]
pub struct MediaProbe {
    /// Probed file.
    pub path: PathBuf,
    /// Probed duration.
    pub duration: ProbedDuration,
    /// Raw metadata dump (or the engine error text when the dump could not be produced).
    pub diagnostics: String,
}

/// Extract the first `Duration: HH:MM:SS.fraction` token from engine output, in seconds.
///
/// `Duration: N/A` and malformed tokens yield `None`.
pub fn parse_duration_token(text: &str) -> Option<f64> {
    let caps = DURATION_TOKEN.captures(text)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Rough duration estimate from file size at a fixed byte rate.
pub fn estimate_from_size(size_bytes: u64, bytes_per_sec: f64) -> f64 {
    size_bytes as f64 / bytes_per_sec
}

/// Probe `path`, falling back to a size estimate when metadata is unusable.
///
/// Fails with [`SlidecastError::NotFound`] when the file cannot be statted.
#[tracing::instrument(skip(engine, opts), fields(path = %path.display()))]
pub fn probe_media<E: MediaEngine + ?Sized>(
    engine: &E,
    path: &Path,
    opts: &ProbeOpts,
) -> SlidecastResult<MediaProbe> {
    let meta = std::fs::metadata(path).map_err(|_| SlidecastError::not_found(path))?;
    if !meta.is_file() {
        return Err(SlidecastError::not_found(path));
    }

    let diagnostics = match engine.dump_metadata(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "metadata dump unavailable");
            e.to_string()
        }
    };

    let duration = match parse_duration_token(&diagnostics) {
        Some(seconds) => ProbedDuration {
            seconds,
            source: DurationSource::Metadata,
        },
        None => {
            let seconds = estimate_from_size(meta.len(), opts.fallback_bytes_per_sec);
            tracing::warn!(
                estimate_sec = seconds,
                size_bytes = meta.len(),
                "no duration in metadata; using rough file-size estimate"
            );
            ProbedDuration {
                seconds,
                source: DurationSource::SizeEstimate,
            }
        }
    };

    Ok(MediaProbe {
        path: path.to_path_buf(),
        duration,
        diagnostics,
    })
}

/// Probe only the duration of `path`. See [`probe_media`].
pub fn probe_duration<E: MediaEngine + ?Sized>(
    engine: &E,
    path: &Path,
    opts: &ProbeOpts,
) -> SlidecastResult<ProbedDuration> {
    probe_media(engine, path, opts).map(|p| p.duration)
}

/// Strict probe: read the duration from metadata or fail with [`SlidecastError::ProbeFailed`].
pub fn probe_metadata_duration<E: MediaEngine + ?Sized>(
    engine: &E,
    path: &Path,
) -> SlidecastResult<f64> {
    if !path.is_file() {
        return Err(SlidecastError::not_found(path));
    }
    let text = engine.dump_metadata(path)?;
    parse_duration_token(&text).ok_or_else(|| {
        SlidecastError::probe(
            format!("no duration found for '{}'", path.display()),
            text.trim(),
        )
    })
}

#[cfg(test)]
#[path = "../tests/unit/probe.rs"]
mod tests;
