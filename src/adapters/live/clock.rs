//! Live clock using the system clock.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Live clock that returns the real current time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_monotonic_with_system_time() {
        let clock = LiveClock;
        let before = Utc::now();
        let now = clock.now();

        assert!(now >= before);
        assert!(now <= Utc::now());
    }
}
