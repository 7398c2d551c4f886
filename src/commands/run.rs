//! `gcm-correct run` command.

use tracing::warn;

use super::{check as check_cmd, gpus, Output};
use crate::catalog;
use crate::check;
use crate::cli::RunArgs;
use crate::config::Settings;
use crate::console::{self, Console};
use crate::context::ServiceContext;
use crate::error::CorrectionError;
use crate::launch::{self, JobResult, LaunchJob};
use crate::ports::process::{LineSink, Stream};
use crate::probe;

/// Relays every child line to stderr so stdout stays a single JSON
/// document in `--json` mode.
struct StderrRelay(Console);

impl LineSink for StderrRelay {
    fn line(&self, stream: Stream, line: &str) {
        match stream {
            Stream::Stdout => console::write_stderr(line),
            Stream::Stderr => self.0.error(line),
        }
    }
}

/// Execute the `run` command: probe, check, then launch.
///
/// # Errors
///
/// Returns [`CorrectionError::UnknownVariable`] before probing,
/// [`CorrectionError::MissingData`] unless `--skip-data-check` is set,
/// any launch error, or [`CorrectionError::ChildProcessFailure`] when the
/// training script exits non-zero.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    args: &RunArgs,
    out: Output,
) -> Result<(), CorrectionError> {
    let spec = catalog::lookup(&args.variable)?;
    let upper = spec.id.to_uppercase();

    let accelerators = probe::probe(ctx);
    if !out.json {
        out.console.section("Checking GPU availability");
        gpus::report(out, &accelerators);
        out.console.section(&format!("Checking data for {upper}"));
    }

    let availability = check::check(ctx, settings, spec.id)?;
    if !out.json {
        check_cmd::report(out, &availability);
    }
    if args.skip_data_check {
        if !availability.ok {
            warn!(missing = availability.missing.len(), "launching despite missing data files");
            if !out.json {
                out.console.info("Data check failed; continuing because --skip-data-check is set");
            }
        }
    } else {
        check_cmd::into_outcome(availability)?;
    }

    let job = LaunchJob { variable: spec.id.to_string(), overrides: args.overrides() };
    let result = if out.json {
        launch::launch(ctx, settings, &job, &StderrRelay(out.console)).await?
    } else {
        out.console.section(&format!("Running UNet correction for {upper}"));
        let script = launch::script_path(settings, spec);
        out.console.info(&format!(
            "Starting execution of {} with {}",
            script.display(),
            settings.interpreter
        ));
        launch::launch(ctx, settings, &job, &out.console).await?
    };

    if out.json {
        out.print_json(&result)?;
    } else if result.succeeded {
        out.console.success(&success_message(&result));
    }
    result.into_result().map(|_| ())
}

fn success_message(result: &JobResult) -> String {
    format!(
        "{} correction completed successfully in {:.2} seconds",
        result.variable.to_uppercase(),
        result.elapsed_seconds
    )
}
