//! Command runner port for short-lived diagnostic commands.

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, or `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a program to completion and captures its output.
///
/// Used for quick probes such as `nvidia-smi`; long-running training
/// processes go through [`crate::ports::ProcessLauncher`] instead.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` (no shell involved) and waits for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be found or spawned.
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> Result<CommandOutput, Box<dyn std::error::Error + Send + Sync>>;
}
