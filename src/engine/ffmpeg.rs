use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::config::EngineOpts;
use crate::engine::{EngineOutput, Invocation, MediaEngine};
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// [`MediaEngine`] that spawns the system `ffmpeg` as a blocking subprocess.
///
/// No timeout is applied; callers needing bounded latency wrap the call themselves.
#[derive(Clone, Debug)]
pub struct FfmpegEngine {
    program: PathBuf,
}

impl FfmpegEngine {
    /// Create an engine from configuration.
    pub fn new(opts: &EngineOpts) -> Self {
        Self::with_program(opts.ffmpeg_path.clone())
    }

    /// Create an engine that runs `program` instead of `ffmpeg` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program this engine spawns.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn output(&self, invocation: &Invocation) -> SlidecastResult<Output> {
        Command::new(&self.program)
            .args(invocation.as_args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::PermissionDenied {
                    SlidecastError::tool_unavailable(format!(
                        "failed to spawn '{}' (is ffmpeg installed and on PATH?): {e}",
                        self.program.display()
                    ))
                } else {
                    SlidecastError::Other(anyhow::Error::new(e).context(format!(
                        "failed to run '{}'",
                        self.program.display()
                    )))
                }
            })
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new(&EngineOpts::default())
    }
}

impl MediaEngine for FfmpegEngine {
    fn ensure_available(&self) -> SlidecastResult<()> {
        let mut inv = Invocation::new();
        inv.arg("-version");
        let out = self.output(&inv)?;
        if !out.status.success() {
            return Err(SlidecastError::tool_unavailable(format!(
                "'{} -version' exited with status {}",
                self.program.display(),
                out.status
            )));
        }
        Ok(())
    }

    fn dump_metadata(&self, path: &Path) -> SlidecastResult<String> {
        // Without an output file ffmpeg prints the input summary and exits non-zero.
        let mut inv = Invocation::new();
        inv.args(["-hide_banner", "-i"]).arg(path);
        let out = self.output(&inv)?;
        Ok(combined_output(&out))
    }

    fn run(&self, invocation: &Invocation) -> SlidecastResult<EngineOutput> {
        tracing::debug!(program = %self.program.display(), args = %invocation, "running media engine");
        let out = self.output(invocation)?;
        Ok(EngineOutput {
            success: out.status.success(),
            status: out.status.to_string(),
            diagnostics: combined_output(&out),
        })
    }
}

fn combined_output(out: &Output) -> String {
    let mut text = String::from_utf8_lossy(&out.stderr).into_owned();
    if !out.stdout.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&out.stdout));
    }
    text
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlidecastResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    FfmpegEngine::default().ensure_available().is_ok()
}

#[cfg(test)]
#[path = "../../tests/unit/engine/ffmpeg.rs"]
mod tests;
