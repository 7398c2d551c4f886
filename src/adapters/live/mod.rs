//! Live adapters backed by the real system.

pub mod clock;
pub mod command;
pub mod filesystem;
pub mod process;

pub use clock::LiveClock;
pub use command::LiveCommandRunner;
pub use filesystem::LiveFileSystem;
pub use process::LiveProcessLauncher;
