//! Port traits defining external boundaries.
//!
//! Each trait is one boundary between the launcher core and the outside
//! world (time, disk, short-lived commands, supervised training processes).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod command;
pub mod filesystem;
pub mod process;

pub use clock::Clock;
pub use command::{CommandOutput, CommandRunner};
pub use filesystem::FileSystem;
pub use process::{LaunchRequest, LineSink, ProcessFuture, ProcessLauncher, Stream};
