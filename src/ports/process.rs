//! Process launcher port for supervised, streamed child processes.

use std::error::Error;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

/// Boxed future returned by [`ProcessLauncher::launch`], resolving to the
/// child's exit code.
pub type ProcessFuture<'a> =
    Pin<Box<dyn Future<Output = Result<i32, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Which child stream a relayed line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// Receives child output one line at a time, as it arrives.
///
/// Lines from one stream arrive in order; lines from different streams
/// may interleave arbitrarily.
pub trait LineSink: Send + Sync {
    /// Handles one line (without its trailing newline).
    fn line(&self, stream: Stream, line: &str);
}

/// What to run: an interpreter and the script it should execute.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Program to execute (e.g. `python3`).
    pub program: String,
    /// Script path passed as the only argument.
    pub script: PathBuf,
}

/// Spawns a child, relays both of its output streams and waits for it.
pub trait ProcessLauncher: Send + Sync {
    /// Runs the request to completion, feeding every output line to `sink`.
    ///
    /// The child inherits the parent environment and gets no stdin. A
    /// child terminated by a signal resolves to `-1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the child cannot be spawned or waited on.
    fn launch<'a>(&'a self, request: &'a LaunchRequest, sink: &'a dyn LineSink)
        -> ProcessFuture<'a>;
}
