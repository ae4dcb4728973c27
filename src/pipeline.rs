//! End-to-end narration merge for one presentation.

use std::path::PathBuf;

use anyhow::Context as _;

use crate::assemble::{AssemblyReport, assemble};
use crate::config::CompositorOpts;
use crate::engine::MediaEngine;
use crate::foundation::core::{NarrationSlot, SlideTiming};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::merge::{MergePlan, merge, plan_merge};

/// Progress of one merge request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStage {
    /// Probing inputs and assembling the narration track.
    Probing,
    /// Choosing codecs and start alignment.
    Planning,
    /// Running the merge.
    Invoking,
    /// Merged output written.
    Done,
    /// A stage failed; the recording is untouched.
    Failed,
}

/// Everything needed to narrate one recording.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MergeRequest {
    /// Silent screen recording.
    pub video_path: PathBuf,
    /// One slot per slide, in slide order.
    pub narration: Vec<NarrationSlot>,
    /// One timing per slide, in slide order.
    pub timings: Vec<SlideTiming>,
    /// Merged output; its extension selects the container.
    pub output_path: PathBuf,
}

impl MergeRequest {
    fn validate(&self) -> SlidecastResult<()> {
        if self.narration.len() != self.timings.len() {
            return Err(SlidecastError::validation(format!(
                "narration slots ({}) and slide timings ({}) must have the same length",
                self.narration.len(),
                self.timings.len()
            )));
        }
        if self.output_path == self.video_path {
            return Err(SlidecastError::validation(format!(
                "output '{}' would overwrite the source recording",
                self.output_path.display()
            )));
        }
        Ok(())
    }
}

/// Result of a successful merge.
#[derive(Clone, Debug, serde::Serialize)]
pub struct MergeOutcome {
    /// Narration track assembly. Its `output` lived in the request's temp dir, which is gone.
    pub assembly: AssemblyReport,
    /// The executed merge plan.
    pub plan: MergePlan,
    /// Final stage (always [`MergeStage::Done`]).
    pub stage: MergeStage,
}

/// Narrates recordings with a [`MediaEngine`].
///
/// Holds no per-request state: one instance can serve concurrent requests.
#[derive(Debug)]
pub struct Compositor<E> {
    engine: E,
    opts: CompositorOpts,
}

impl<E: MediaEngine> Compositor<E> {
    /// Create a compositor running `engine` with `opts`.
    pub fn new(engine: E, opts: CompositorOpts) -> Self {
        Self { engine, opts }
    }

    /// The media engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Active options.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Assemble the narration track and merge it with the recording.
    ///
    /// The intermediate track lives in a fresh temp dir owned by this call and removed when it
    /// returns. On failure the source recording is untouched.
    #[tracing::instrument(skip_all, fields(video = %req.video_path.display(), output = %req.output_path.display()))]
    pub fn merge_narration(&self, req: &MergeRequest) -> SlidecastResult<MergeOutcome> {
        let mut stage = MergeStage::Probing;
        let res = self.run_stages(req, &mut stage);
        match res {
            Ok((assembly, plan)) => {
                stage = MergeStage::Done;
                tracing::info!(?stage, "narration merged");
                Ok(MergeOutcome {
                    assembly,
                    plan,
                    stage,
                })
            }
            Err(e) => {
                tracing::error!(failed_at = ?stage, stage = ?MergeStage::Failed, error = %e, "merge failed");
                Err(e)
            }
        }
    }

    fn run_stages(
        &self,
        req: &MergeRequest,
        stage: &mut MergeStage,
    ) -> SlidecastResult<(AssemblyReport, MergePlan)> {
        self.engine.ensure_available()?;
        req.validate()?;
        if !req.video_path.is_file() {
            return Err(SlidecastError::not_found(&req.video_path));
        }

        let scratch = tempfile::Builder::new()
            .prefix("slidecast_merge_")
            .tempdir()
            .context("create request temp dir")?;
        let track = scratch.path().join(&self.opts.audio.file_name);

        let assembly = assemble(&self.engine, &req.narration, &req.timings, &track, &self.opts)?;

        *stage = MergeStage::Planning;
        let plan = plan_merge(
            &self.engine,
            &req.video_path,
            &track,
            &req.output_path,
            &self.opts,
        )?;

        *stage = MergeStage::Invoking;
        merge(&self.engine, &plan)?;
        Ok((assembly, plan))
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
