//! Binary entrypoint for the `gcm-correct` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Settings may come from a local .env file; absence is fine.
    let _ = dotenvy::dotenv();
    match gcm_correct::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}
