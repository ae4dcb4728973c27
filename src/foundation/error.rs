use std::path::PathBuf;

/// Convenience result type used across slidecast.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Engine-related variants carry the captured diagnostic text of the external media engine so an
/// operator can see exactly what `ffmpeg` complained about.
#[derive(thiserror::Error, Debug)]
pub enum SlidecastError {
    /// The external media engine cannot be located or started.
    #[error("tool unavailable: {0}")]
    ToolUnavailable(String),

    /// A media file could not be probed for its duration.
    #[error("probe error: {message}")]
    ProbeFailed {
        /// Short description of the failure.
        message: String,
        /// Engine output captured while probing.
        diagnostics: String,
    },

    /// A required input file does not exist or cannot be statted.
    #[error("not found: '{}'", .0.display())]
    NotFound(PathBuf),

    /// Building the timed narration track failed. No partial track is usable.
    #[error("assembly error: {message}")]
    AssemblyFailed {
        /// Short description of the failure.
        message: String,
        /// Engine output captured during assembly.
        diagnostics: String,
    },

    /// Muxing the narration track with the recording failed.
    #[error("merge error: {message}")]
    MergeFailed {
        /// Short description of the failure.
        message: String,
        /// Engine output captured during the merge.
        diagnostics: String,
    },

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidecastError {
    /// Build a [`SlidecastError::ToolUnavailable`] value.
    pub fn tool_unavailable(msg: impl Into<String>) -> Self {
        Self::ToolUnavailable(msg.into())
    }

    /// Build a [`SlidecastError::ProbeFailed`] value.
    pub fn probe(msg: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::ProbeFailed {
            message: msg.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Build a [`SlidecastError::NotFound`] value.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Build a [`SlidecastError::AssemblyFailed`] value.
    pub fn assembly(msg: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::AssemblyFailed {
            message: msg.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Build a [`SlidecastError::MergeFailed`] value.
    pub fn merge(msg: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::MergeFailed {
            message: msg.into(),
            diagnostics: diagnostics.into(),
        }
    }

    /// Build a [`SlidecastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Engine diagnostics attached to this error, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::ProbeFailed { diagnostics, .. }
            | Self::AssemblyFailed { diagnostics, .. }
            | Self::MergeFailed { diagnostics, .. } => Some(diagnostics.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
