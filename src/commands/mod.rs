//! Command dispatch and handlers.

pub mod check;
pub mod gpus;
pub mod list;
pub mod run;

use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::console::{self, Console};
use crate::context::ServiceContext;
use crate::error::CorrectionError;

/// How command results are presented.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Styled text printer.
    pub console: Console,
    /// Print JSON documents instead of styled text.
    pub json: bool,
}

impl Output {
    /// Pretty-prints `value` as JSON on stdout.
    ///
    /// # Errors
    ///
    /// Returns [`CorrectionError::Json`] if `value` cannot be serialized.
    pub fn print_json<T: Serialize>(self, value: &T) -> Result<(), CorrectionError> {
        console::write_stdout(&serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Reports a failure on stderr, in the active output style.
    pub fn report_error(self, err: &CorrectionError) {
        if self.json {
            console::write_stderr(&serde_json::json!({ "error": err.to_string() }).to_string());
            return;
        }
        match err {
            CorrectionError::MissingData { missing, .. } => {
                self.console.error("Missing required data files:");
                for path in missing {
                    console::write_stderr(&format!("  - {}", path.display()));
                }
            }
            _ => self.console.error(&err.to_string()),
        }
    }
}

/// Dispatch a parsed command line to its handler, reporting any failure.
///
/// # Errors
///
/// Returns the handler's error after it has been printed.
pub fn dispatch(cli: &Cli) -> Result<(), CorrectionError> {
    let out = Output { console: Console::new(!cli.global.no_color), json: cli.global.json };
    if !out.json {
        out.console.header();
    }

    let ctx = ServiceContext::live();
    let result = dispatch_with_context(cli, &ctx, out);
    if let Err(err) = &result {
        out.report_error(err);
    }
    result
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    cli: &Cli,
    ctx: &ServiceContext,
    out: Output,
) -> Result<(), CorrectionError> {
    match &cli.command {
        Command::ListVariables => list::run(out),
        Command::Gpus => gpus::run(ctx, out),
        Command::Check { variable } => {
            let settings = load_settings(cli)?;
            check::run(ctx, &settings, variable, out)
        }
        Command::Run(args) => {
            let settings = load_settings(cli)?;
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
            runtime.block_on(run::run(ctx, &settings, args, out))
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, CorrectionError> {
    Settings::load(cli.global.config.as_deref(), &cli.global.settings_overrides())
}
