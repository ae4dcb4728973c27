//! Scripted [`MediaEngine`] for unit tests.
//!
//! Metadata dumps are answered from canned ffmpeg-style text keyed by path. Every `run` is
//! recorded; outputs registered with [`ScriptedEngine::with_output`] are created on disk and
//! become probeable once the invocation that writes them succeeds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::engine::{EngineOutput, Invocation, MediaEngine};
use crate::foundation::error::{SlidecastError, SlidecastResult};

pub(crate) struct ScriptedEngine {
    available: bool,
    metadata: Mutex<HashMap<PathBuf, String>>,
    outputs: HashMap<String, String>,
    failure: Option<(String, String)>,
    runs: Mutex<Vec<Invocation>>,
}

impl ScriptedEngine {
    pub(crate) fn new() -> Self {
        Self {
            available: true,
            metadata: Mutex::new(HashMap::new()),
            outputs: HashMap::new(),
            failure: None,
            runs: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose executable cannot be found.
    pub(crate) fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub(crate) fn with_metadata(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.metadata
            .lock()
            .unwrap()
            .insert(path.into(), text.into());
        self
    }

    pub(crate) fn with_audio(self, path: impl Into<PathBuf>, seconds: f64) -> Self {
        let path = path.into();
        let text = audio_dump(&path, seconds);
        self.with_metadata(path, text)
    }

    pub(crate) fn with_video(self, path: impl Into<PathBuf>, seconds: f64, codec: &str) -> Self {
        let path = path.into();
        let text = video_dump(&path, seconds, codec);
        self.with_metadata(path, text)
    }

    /// When a successful run writes a file named `file_name`, make it an audio file of `seconds`.
    pub(crate) fn with_output(mut self, file_name: &str, seconds: f64) -> Self {
        self.outputs
            .insert(file_name.to_string(), audio_dump(Path::new(file_name), seconds));
        self
    }

    /// Fail every run whose arguments contain `flag`.
    pub(crate) fn failing_runs_with(mut self, flag: &str, diagnostics: &str) -> Self {
        self.failure = Some((flag.to_string(), diagnostics.to_string()));
        self
    }

    pub(crate) fn runs(&self) -> Vec<Invocation> {
        self.runs.lock().unwrap().clone()
    }
}

impl MediaEngine for ScriptedEngine {
    fn ensure_available(&self) -> SlidecastResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(SlidecastError::tool_unavailable(
                "failed to spawn 'ffmpeg' (is ffmpeg installed and on PATH?)",
            ))
        }
    }

    fn dump_metadata(&self, path: &Path) -> SlidecastResult<String> {
        self.ensure_available()?;
        Ok(self
            .metadata
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_else(|| {
                format!("{}: Invalid data found when processing input\n", path.display())
            }))
    }

    fn run(&self, invocation: &Invocation) -> SlidecastResult<EngineOutput> {
        self.ensure_available()?;
        self.runs.lock().unwrap().push(invocation.clone());

        if let Some((flag, diagnostics)) = &self.failure
            && invocation.contains(flag)
        {
            return Ok(EngineOutput {
                success: false,
                status: "exit status: 1".to_string(),
                diagnostics: diagnostics.clone(),
            });
        }

        if let Some(last) = invocation.as_args().last() {
            let out = PathBuf::from(last);
            let name = out
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if let Some(text) = self.outputs.get(&name) {
                std::fs::write(&out, b"scripted output").unwrap();
                self.metadata.lock().unwrap().insert(out, text.clone());
            }
        }

        Ok(EngineOutput {
            success: true,
            status: "exit status: 0".to_string(),
            diagnostics: String::new(),
        })
    }
}

pub(crate) fn ffmpeg_timestamp(seconds: f64) -> String {
    let centis = (seconds * 100.0).round() as u64;
    let h = centis / 360_000;
    let m = (centis / 6_000) % 60;
    let s = (centis / 100) % 60;
    let c = centis % 100;
    format!("{h:02}:{m:02}:{s:02}.{c:02}")
}

pub(crate) fn audio_dump(path: &Path, seconds: f64) -> String {
    format!(
        "Input #0, mp3, from '{}':\n  Duration: {}, start: 0.025057, bitrate: 128 kb/s\n  Stream #0:0: Audio: mp3, 44100 Hz, stereo, fltp, 128 kb/s\n",
        path.display(),
        ffmpeg_timestamp(seconds)
    )
}

pub(crate) fn video_dump(path: &Path, seconds: f64, codec: &str) -> String {
    format!(
        "Input #0, matroska,webm, from '{}':\n  Duration: {}, start: 0.000000, bitrate: 812 kb/s\n  Stream #0:0: Video: {codec}, yuv420p(tv, bt709, progressive), 1280x720, SAR 1:1 DAR 16:9, 30 fps, 30 tbr, 1k tbn (default)\n",
        path.display(),
        ffmpeg_timestamp(seconds)
    )
}

/// Create a file of `len` bytes at `dir/name`.
pub(crate) fn touch(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![0u8; len]).unwrap();
    path
}
