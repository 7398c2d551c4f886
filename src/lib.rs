//! Core library entry for the `gcm-correct` CLI.
//!
//! The launcher prepares and supervises UNet bias-correction training
//! scripts: it probes accelerators, checks input data, patches
//! hyperparameters into a transient copy of the script and relays the
//! child's output while it trains.

pub mod adapters;
pub mod catalog;
pub mod check;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod launch;
pub mod ports;
pub mod probe;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use error::CorrectionError;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "GCM_CORRECT_LOG";

/// Run the CLI with the provided arguments.
///
/// Failures are printed before returning.
///
/// # Errors
///
/// Returns the process exit code to terminate with: clap's own code for
/// usage errors, otherwise [`CorrectionError::exit_code`].
pub fn run<I, T>(args: I) -> Result<(), u8>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.exit_code() {
                0 => Ok(()),
                code => Err(u8::try_from(code).unwrap_or(2)),
            };
        }
    };
    init_tracing(cli.global.verbose);
    commands::dispatch(&cli).map_err(|err| err.exit_code())
}

/// Installs the stderr log subscriber once per process.
///
/// `GCM_CORRECT_LOG` wins over the `-v` count when set.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "gcm_correct=warn",
        1 => "gcm_correct=info",
        _ => "gcm_correct=debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
