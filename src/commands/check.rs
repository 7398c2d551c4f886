//! `gcm-correct check` command.

use super::Output;
use crate::check::{self, CheckResult};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::CorrectionError;

/// Execute the `check` command.
///
/// # Errors
///
/// Returns [`CorrectionError::MissingData`] when any required file is
/// absent, or the checker's own error.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    variable: &str,
    out: Output,
) -> Result<(), CorrectionError> {
    if !out.json {
        out.console.section(&format!("Checking data for {}", variable.to_uppercase()));
    }
    let result = check::check(ctx, settings, variable)?;
    if out.json {
        out.print_json(&result)?;
    } else {
        report(out, &result);
    }
    into_outcome(result)
}

/// Prints created directories and, when complete, the success line.
/// Missing files are listed by the error reporter.
pub(crate) fn report(out: Output, result: &CheckResult) {
    for dir in &result.created_dirs {
        out.console.info(&format!("Created directory: {}", dir.display()));
    }
    if result.ok {
        out.console.success(&format!(
            "All required data files for {} are available",
            result.variable.to_uppercase()
        ));
    }
}

/// `Ok` when nothing is missing.
pub(crate) fn into_outcome(result: CheckResult) -> Result<(), CorrectionError> {
    if result.ok {
        Ok(())
    } else {
        Err(CorrectionError::MissingData { variable: result.variable, missing: result.missing })
    }
}
