//! Error taxonomy for checks and launches.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between parsing a variable id and reaping
/// the training process.
#[derive(Debug, Error)]
pub enum CorrectionError {
    /// The variable identifier is not in the catalogue.
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// The training script for the variable is not on disk.
    #[error("Script file not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// Model reuse was requested but the construction line is absent.
    #[error("Cannot inject model reuse: marker `{marker}` not found in {}", .script.display())]
    PatchTargetNotFound {
        /// Literal line that was searched for.
        marker: String,
        /// Script that was searched.
        script: PathBuf,
    },

    /// Required input data files are absent.
    #[error("Missing required data files for {variable}: {}", format_paths(.missing))]
    MissingData {
        /// Variable whose data was checked.
        variable: String,
        /// Paths that do not exist.
        missing: Vec<PathBuf>,
    },

    /// The child process could not be started.
    #[error("Failed to start {program}: {message}")]
    Spawn {
        /// Interpreter that failed to launch.
        program: String,
        /// Underlying error.
        message: String,
    },

    /// The child ran and exited unsuccessfully.
    #[error("{} correction failed with return code {exit_code}", .variable.to_uppercase())]
    ChildProcessFailure {
        /// Variable whose training script failed.
        variable: String,
        /// Exit code reported by the child (`-1` if killed by a signal).
        exit_code: i32,
    },

    /// A directory, script or transient file operation failed.
    #[error("Failed to {action} {}: {message}", .path.display())]
    FileSystem {
        /// What was being attempted (e.g. "create directory").
        action: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// Settings could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A result could not be rendered as JSON.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The async runtime could not be started.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CorrectionError {
    /// Builds a [`CorrectionError::FileSystem`] from a port error.
    pub(crate) fn fs(
        action: &'static str,
        path: impl Into<PathBuf>,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Self {
        Self::FileSystem { action, path: path.into(), message: err.to_string() }
    }

    /// Process exit code the CLI should terminate with.
    ///
    /// A failed child propagates its own code when it fits in `1..=255`;
    /// everything else maps to `1`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ChildProcessFailure { exit_code, .. } => {
                u8::try_from(*exit_code).ok().filter(|code| *code != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}
