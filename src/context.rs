//! Service context bundling all port trait objects.

use crate::adapters::live::{LiveClock, LiveCommandRunner, LiveFileSystem, LiveProcessLauncher};
use crate::ports::clock::Clock;
use crate::ports::command::CommandRunner;
use crate::ports::filesystem::FileSystem;
use crate::ports::process::ProcessLauncher;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Tests build the
/// struct directly with fakes in place of the live adapters.
pub struct ServiceContext {
    /// Clock for launch timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem for checks, scripts and transient files.
    pub fs: Box<dyn FileSystem>,
    /// Runner for short diagnostic commands.
    pub commands: Box<dyn CommandRunner>,
    /// Launcher for supervised training processes.
    pub launcher: Box<dyn ProcessLauncher>,
}

impl ServiceContext {
    /// Creates a context wired to the real system.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            commands: Box::new(LiveCommandRunner),
            launcher: Box::new(LiveProcessLauncher),
        }
    }
}
