//! Live command runner using `std::process::Command`.

use std::process::{Command, Stdio};

use crate::ports::command::{CommandOutput, CommandRunner};

/// Runs programs directly (no shell) and captures their output.
pub struct LiveCommandRunner;

impl CommandRunner for LiveCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new(program).args(args).stdin(Stdio::null()).output()?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
