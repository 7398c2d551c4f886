//! Patch-and-launch supervision of training scripts.
//!
//! A launch moves through `resolve -> (patch) -> spawn -> stream ->
//! terminate -> clean up`. Resolution and patching fail fast before any
//! process exists. Once a transient script has been written it is removed
//! on every path out, best-effort.
//!
//! Launches are not coordinated with each other: two concurrent launches
//! of the same variable share one transient file name and the last writer
//! wins. There is no cancellation either; if the parent is killed the
//! child keeps running and the transient file stays behind.

pub mod patch;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::catalog::{self, VariableSpec};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::CorrectionError;
use crate::ports::process::{LaunchRequest, LineSink};

pub use patch::{Overrides, PatchReport};

/// One requested training run.
#[derive(Debug, Clone)]
pub struct LaunchJob {
    /// Variable identifier, resolved through the catalogue.
    pub variable: String,
    /// Requested script modifications.
    pub overrides: Overrides,
}

/// How a launched training run ended.
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    /// Variable that was trained.
    pub variable: String,
    /// Script that was executed (the transient copy when patched).
    pub script: PathBuf,
    /// `true` iff the child exited with code 0.
    pub succeeded: bool,
    /// Child exit code; `-1` when it was killed by a signal.
    pub exit_code: i32,
    /// Wall-clock seconds from spawn to termination.
    pub elapsed_seconds: f64,
    /// When the child was spawned.
    pub started_at: DateTime<Utc>,
    /// When the child terminated.
    pub finished_at: DateTime<Utc>,
    /// What patching changed, when the script was patched.
    pub patch: Option<PatchReport>,
}

impl JobResult {
    /// Converts an unsuccessful result into
    /// [`CorrectionError::ChildProcessFailure`].
    ///
    /// # Errors
    ///
    /// Returns the failure when `succeeded` is `false`.
    pub fn into_result(self) -> Result<Self, CorrectionError> {
        if self.succeeded {
            Ok(self)
        } else {
            Err(CorrectionError::ChildProcessFailure {
                variable: self.variable,
                exit_code: self.exit_code,
            })
        }
    }
}

/// Path of the training script for `spec`.
#[must_use]
pub fn script_path(settings: &Settings, spec: &VariableSpec) -> PathBuf {
    settings.scripts_dir.join(spec.script)
}

/// Path of the patched copy written for `spec`.
#[must_use]
pub fn transient_path(settings: &Settings, spec: &VariableSpec) -> PathBuf {
    settings.transient_dir().join(format!("temp_{}_unet.py", spec.id))
}

/// Path where the training script saves (and reuse loads) the model.
#[must_use]
pub fn model_path(settings: &Settings, spec: &VariableSpec) -> PathBuf {
    settings.models_dir().join(format!("unet_{}_model.h5", spec.model_folder))
}

/// Runs `job` to completion, relaying child output to `sink`.
///
/// A child that runs and exits non-zero is *not* an error here; inspect
/// [`JobResult::succeeded`] or call [`JobResult::into_result`].
///
/// # Errors
///
/// - [`CorrectionError::UnknownVariable`] / [`CorrectionError::ScriptNotFound`]
///   before anything is touched.
/// - [`CorrectionError::PatchTargetNotFound`] or
///   [`CorrectionError::FileSystem`] while preparing the transient script.
/// - [`CorrectionError::Spawn`] if the interpreter cannot be started.
pub async fn launch(
    ctx: &ServiceContext,
    settings: &Settings,
    job: &LaunchJob,
    sink: &dyn LineSink,
) -> Result<JobResult, CorrectionError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("launch", variable = %job.variable, %run_id);
    supervise(ctx, settings, job, sink).instrument(span).await
}

async fn supervise(
    ctx: &ServiceContext,
    settings: &Settings,
    job: &LaunchJob,
    sink: &dyn LineSink,
) -> Result<JobResult, CorrectionError> {
    let spec = catalog::lookup(&job.variable)?;
    let original = script_path(settings, spec);
    if !ctx.fs.exists(&original) {
        return Err(CorrectionError::ScriptNotFound(original));
    }

    let (script, transient, report) = if job.overrides.is_empty() {
        debug!(script = %original.display(), "running script unmodified");
        (original, None, None)
    } else {
        let (path, report) = write_patched(ctx, settings, spec, &original, &job.overrides)?;
        (path.clone(), Some(TransientScript { ctx, path }), Some(report))
    };

    let request = LaunchRequest { program: settings.interpreter.clone(), script: script.clone() };
    info!(program = %request.program, script = %script.display(), "starting execution");

    let started_at = ctx.clock.now();
    let outcome = ctx.launcher.launch(&request, sink).await;
    let finished_at = ctx.clock.now();

    drop(transient);

    let exit_code = outcome.map_err(|e| CorrectionError::Spawn {
        program: settings.interpreter.clone(),
        message: e.to_string(),
    })?;
    let elapsed_seconds =
        (finished_at - started_at).to_std().map(|d| d.as_secs_f64()).unwrap_or_default();
    info!(exit_code, elapsed_seconds, "training process finished");

    Ok(JobResult {
        variable: spec.id.to_string(),
        script,
        succeeded: exit_code == 0,
        exit_code,
        elapsed_seconds,
        started_at,
        finished_at,
        patch: report,
    })
}

/// Patches the original script and writes it to the transient path.
fn write_patched(
    ctx: &ServiceContext,
    settings: &Settings,
    spec: &VariableSpec,
    original: &Path,
    overrides: &Overrides,
) -> Result<(PathBuf, PatchReport), CorrectionError> {
    let body = ctx
        .fs
        .read_to_string(original)
        .map_err(|e| CorrectionError::fs("read script", original, &*e))?;
    let patched = patch::apply(&body, overrides, &model_path(settings, spec), original)?;

    if overrides.epochs.is_some() && patched.report.epochs_replaced == 0 {
        warn!(
            defaults = ?patch::EPOCH_DEFAULTS,
            "no default epoch literal found; epochs override has no effect"
        );
    }
    if overrides.batch_size.is_some() && patched.report.batch_size_replaced == 0 {
        warn!(
            defaults = ?patch::BATCH_SIZE_DEFAULTS,
            "no default batch_size literal found; batch size override has no effect"
        );
    }

    let path = transient_path(settings, spec);
    ctx.fs
        .write(&path, &patched.body)
        .map_err(|e| CorrectionError::fs("write transient script", &path, &*e))?;
    debug!(path = %path.display(), report = ?patched.report, "wrote patched script");
    Ok((path, patched.report))
}

/// A written transient script, removed when dropped.
///
/// Dropping also happens while unwinding, so a sink that panics mid-relay
/// does not leave the patched copy behind.
struct TransientScript<'a> {
    ctx: &'a ServiceContext,
    path: PathBuf,
}

impl Drop for TransientScript<'_> {
    fn drop(&mut self) {
        match self.ctx.fs.remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed transient script"),
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "could not remove transient script"
            ),
        }
    }
}
