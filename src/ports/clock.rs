//! Clock port for timestamping launches.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Launch results carry start and finish timestamps taken from this port,
/// so tests can pin them.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
