//! External media engine seam.
//!
//! The compositor only decides which commands to run; executing them is delegated to a
//! [`MediaEngine`]. [`ffmpeg::FfmpegEngine`] is the production implementation.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;

use crate::foundation::error::SlidecastResult;

/// `ffmpeg` subprocess engine.
pub mod ffmpeg;

/// Result of one engine invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineOutput {
    /// Whether the process exited successfully.
    pub success: bool,
    /// Human-readable exit status.
    pub status: String,
    /// Captured diagnostic output (stderr followed by stdout).
    pub diagnostics: String,
}

/// Ordered argument list for one engine invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<OsString>,
}

impl Invocation {
    /// Create an empty invocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one argument.
    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for a in args {
            self.arg(a);
        }
        self
    }

    /// Borrow the raw arguments.
    pub fn as_args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn to_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Every value that directly follows `flag`, in order.
    pub fn values_of(&self, flag: &str) -> Vec<String> {
        self.args
            .windows(2)
            .filter(|w| w[0] == flag)
            .map(|w| w[1].to_string_lossy().into_owned())
            .collect()
    }

    /// The first value that directly follows `flag`.
    pub fn value_of(&self, flag: &str) -> Option<String> {
        self.values_of(flag).into_iter().next()
    }

    /// Return `true` when `flag` appears anywhere in the argument list.
    pub fn contains(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let s = a.to_string_lossy();
            if s.is_empty() || s.contains([' ', ';', '[', ']']) {
                write!(f, "'{s}'")?;
            } else {
                f.write_str(&s)?;
            }
        }
        Ok(())
    }
}

/// Contract for the external media-processing engine.
///
/// Implementations must be usable from several concurrent pipelines, so `&self` is all they get.
pub trait MediaEngine: Send + Sync {
    /// Fail with [`crate::SlidecastError::ToolUnavailable`] when the engine cannot be started.
    fn ensure_available(&self) -> SlidecastResult<()>;

    /// Return the engine's metadata dump (diagnostic text) for `path`.
    ///
    /// The dump is returned even if the engine reports an error for the file; callers parse
    /// whatever text was produced.
    fn dump_metadata(&self, path: &Path) -> SlidecastResult<String>;

    /// Run one invocation to completion and capture its diagnostics.
    fn run(&self, invocation: &Invocation) -> SlidecastResult<EngineOutput>;
}

impl<E: MediaEngine + ?Sized> MediaEngine for &E {
    fn ensure_available(&self) -> SlidecastResult<()> {
        (**self).ensure_available()
    }

    fn dump_metadata(&self, path: &Path) -> SlidecastResult<String> {
        (**self).dump_metadata(path)
    }

    fn run(&self, invocation: &Invocation) -> SlidecastResult<EngineOutput> {
        (**self).run(invocation)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/invocation.rs"]
mod tests;
