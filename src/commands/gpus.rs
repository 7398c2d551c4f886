//! `gcm-correct gpus` command.

use super::Output;
use crate::context::ServiceContext;
use crate::error::CorrectionError;
use crate::probe::{self, AcceleratorInfo};

/// Execute the `gpus` command.
///
/// A host without GPUs is not a failure.
///
/// # Errors
///
/// Returns an error only if JSON rendering fails.
pub fn run(ctx: &ServiceContext, out: Output) -> Result<(), CorrectionError> {
    let info = probe::probe(ctx);
    if out.json {
        return out.print_json(&info);
    }
    out.console.section("Checking GPU availability");
    report(out, &info);
    Ok(())
}

/// Prints a probe result as styled text.
pub(crate) fn report(out: Output, info: &AcceleratorInfo) {
    if info.is_empty() {
        if info.hidden {
            out.console.info("GPUs hidden by CUDA_VISIBLE_DEVICES. Training will run on CPU.");
        } else {
            out.console.info("No GPUs found. Training will run on CPU.");
        }
        return;
    }

    let names: Vec<&str> = info.accelerators.iter().map(|a| a.name.as_str()).collect();
    out.console.success(&format!("Found {} GPU(s): {}", names.len(), names.join(", ")));
    for accelerator in &info.accelerators {
        if let Some(label) = &accelerator.label {
            out.console.info(&format!("  - {}: {label}", accelerator.name));
        }
    }
}
