//! Literal text patching of training scripts.
//!
//! Overrides are applied by plain substring replacement of known default
//! values. A script that spells a default differently (`epochs = 500`,
//! `epochs=250`) is left as is; the [`PatchReport`] records how many
//! replacements actually happened so callers can warn about it.

use std::num::NonZeroU32;
use std::path::Path;

use serde::Serialize;

use crate::error::CorrectionError;

/// Epoch counts the training scripts ship with.
pub const EPOCH_DEFAULTS: &[u32] = &[500, 1000, 2000];

/// Batch sizes the training scripts ship with.
pub const BATCH_SIZE_DEFAULTS: &[u32] = &[32, 64];

/// Statement that builds a fresh model in every training script.
pub const MODEL_MARKER: &str = "model = create_unet_model()";

/// Hyperparameter overrides requested for one launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replacement epoch count.
    pub epochs: Option<NonZeroU32>,
    /// Replacement batch size.
    pub batch_size: Option<NonZeroU32>,
    /// Load the previously saved model instead of building a new one.
    pub reuse_existing_model: bool,
}

impl Overrides {
    /// Returns `true` when nothing needs patching.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.epochs.is_none() && self.batch_size.is_none() && !self.reuse_existing_model
    }
}

/// What a patch actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    /// Number of default epoch literals now set to the override.
    pub epochs_replaced: usize,
    /// Number of default batch size literals now set to the override.
    pub batch_size_replaced: usize,
    /// Whether the model-reuse block was injected.
    pub model_reuse_injected: bool,
}

/// A patched script body and its report.
#[derive(Debug, Clone)]
pub struct PatchedScript {
    /// Full text to write to the transient script.
    pub body: String,
    /// Replacement counts.
    pub report: PatchReport,
}

/// Applies `overrides` to `body`.
///
/// `model_path` is where the reuse block looks for a saved model;
/// `script` is only used in the error.
///
/// # Errors
///
/// Returns [`CorrectionError::PatchTargetNotFound`] when model reuse is
/// requested but [`MODEL_MARKER`] does not appear in `body`.
pub fn apply(
    body: &str,
    overrides: &Overrides,
    model_path: &Path,
    script: &Path,
) -> Result<PatchedScript, CorrectionError> {
    let mut body = body.to_string();
    let mut report = PatchReport::default();

    if let Some(epochs) = overrides.epochs {
        report.epochs_replaced = replace_defaults(&mut body, "epochs", EPOCH_DEFAULTS, epochs);
    }
    if let Some(batch_size) = overrides.batch_size {
        report.batch_size_replaced =
            replace_defaults(&mut body, "batch_size", BATCH_SIZE_DEFAULTS, batch_size);
    }
    if overrides.reuse_existing_model {
        if !body.contains(MODEL_MARKER) {
            return Err(CorrectionError::PatchTargetNotFound {
                marker: MODEL_MARKER.to_string(),
                script: script.to_path_buf(),
            });
        }
        body = inject_model_reuse(&body, model_path);
        report.model_reuse_injected = true;
    }

    Ok(PatchedScript { body, report })
}

/// Replaces `<key>=<default>` with `<key>=<value>` in a single pass,
/// returning the number of default literals matched.
///
/// A default equal to `value` is matched and left as is, so a script that
/// already carries the requested value still counts. Text produced by a
/// replacement is never matched again, so `epochs=10000` does not turn into
/// `epochs=100000` through the `epochs=1000` default.
fn replace_defaults(body: &mut String, key: &str, defaults: &[u32], value: NonZeroU32) -> usize {
    let replacement = format!("{key}={value}");
    let literals: Vec<String> =
        defaults.iter().map(|default| format!("{key}={default}")).collect();

    let mut out = String::with_capacity(body.len());
    let mut rest = body.as_str();
    let mut replaced = 0;
    while let Some((at, len)) = literals
        .iter()
        .filter_map(|literal| rest.find(literal.as_str()).map(|at| (at, literal.len())))
        .min_by_key(|&(at, len)| (at, std::cmp::Reverse(len)))
    {
        out.push_str(&rest[..at]);
        out.push_str(&replacement);
        rest = &rest[at + len..];
        replaced += 1;
    }
    if replaced > 0 {
        out.push_str(rest);
        *body = out;
    }
    replaced
}

/// Swaps every marker occurrence for a load-or-build block.
///
/// When the marker starts its line after whitespace only, the block takes
/// that indentation so it stays valid inside functions.
fn inject_model_reuse(body: &str, model_path: &Path) -> String {
    let mut out = String::with_capacity(body.len() + 512);
    for line in body.split_inclusive('\n') {
        let Some(at) = line.find(MODEL_MARKER) else {
            out.push_str(line);
            continue;
        };
        let prefix = &line[..at];
        let indent = if prefix.chars().all(char::is_whitespace) { prefix } else { "" };
        out.push_str(prefix);
        out.push_str(&reuse_block(model_path, indent));
        let rest = &line[at + MODEL_MARKER.len()..];
        out.push_str(&rest.replace(MODEL_MARKER, &reuse_block(model_path, "")));
    }
    out
}

/// Renders the load-or-build block; the first line carries no indent since
/// it replaces the marker in place.
fn reuse_block(model_path: &Path, indent: &str) -> String {
    let path = python_str(&model_path.display().to_string());
    [
        "try:".to_string(),
        format!("{indent}    print('Attempting to load existing UNet model...')"),
        format!(
            "{indent}    model = keras.models.load_model({path}, \
             custom_objects={{\"mse_loss\": custom_mse_loss(mask)}})"
        ),
        format!("{indent}    print('Loaded existing model')"),
        format!("{indent}except Exception as e:"),
        format!("{indent}    print('Creating new UNet model:', e)"),
        format!("{indent}    {MODEL_MARKER}"),
    ]
    .join("\n")
}

/// Single-quoted Python string literal.
fn python_str(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
