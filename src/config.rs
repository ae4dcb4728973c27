//! Compositor configuration.
//!
//! Every knob has a default matching the behavior recorded presentations were tuned against, so
//! an empty JSON object (`{}`) is a valid configuration file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Options for locating and running the external media engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    /// Program name or path of the `ffmpeg` executable.
    pub ffmpeg_path: PathBuf,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

/// Options for the duration prober.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProbeOpts {
    /// Assumed byte rate for the file-size fallback (16_000 B/s = 128 kbit/s).
    pub fallback_bytes_per_sec: f64,
}

impl Default for ProbeOpts {
    fn default() -> Self {
        Self {
            fallback_bytes_per_sec: 16_000.0,
        }
    }
}

/// Format of the intermediate narration track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioTrackOpts {
    /// Sample rate shared by narration and generated silence.
    pub sample_rate: u32,
    /// Channel layout shared by narration and generated silence.
    pub channel_layout: String,
    /// Encoder used for the assembled track.
    pub codec: String,
    /// Encoder bitrate.
    pub bitrate: String,
    /// File name of the assembled track inside the request's temp directory.
    pub file_name: String,
}

impl Default for AudioTrackOpts {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channel_layout: "stereo".to_string(),
            codec: "libmp3lame".to_string(),
            bitrate: "192k".to_string(),
            file_name: "concatenated_audio.mp3".to_string(),
        }
    }
}

/// Options for the final audio/video merge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MergeOpts {
    /// Leading video drift above this many seconds is cut from the recording.
    pub seek_threshold_sec: f64,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl Default for MergeOpts {
    fn default() -> Self {
        Self {
            seek_threshold_sec: 0.5,
            overwrite: true,
        }
    }
}

/// Top-level compositor configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorOpts {
    /// Media engine location.
    pub engine: EngineOpts,
    /// Duration prober options.
    pub probe: ProbeOpts,
    /// Narration track format.
    pub audio: AudioTrackOpts,
    /// Merge options.
    pub merge: MergeOpts,
}

impl CompositorOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlidecastResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| SlidecastError::validation(format!("parse compositor config JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlidecastResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlidecastError::validation(format!("open compositor config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values the engine would choke on later.
    pub fn validate(&self) -> SlidecastResult<()> {
        if self.audio.sample_rate == 0 {
            return Err(SlidecastError::validation("audio.sample_rate must be non-zero"));
        }
        if self.audio.channel_layout.trim().is_empty() {
            return Err(SlidecastError::validation(
                "audio.channel_layout must not be empty",
            ));
        }
        if self.audio.file_name.trim().is_empty() {
            return Err(SlidecastError::validation("audio.file_name must not be empty"));
        }
        if !(self.probe.fallback_bytes_per_sec.is_finite() && self.probe.fallback_bytes_per_sec > 0.0)
        {
            return Err(SlidecastError::validation(
                "probe.fallback_bytes_per_sec must be positive",
            ));
        }
        if !(self.merge.seek_threshold_sec.is_finite() && self.merge.seek_threshold_sec >= 0.0) {
            return Err(SlidecastError::validation(
                "merge.seek_threshold_sec must be a non-negative number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
