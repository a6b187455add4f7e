//! Time source for event timestamps and the throw cooldown.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock. On wasm32 chrono reads `Date.now()` through js-sys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::*;
    use chrono::TimeDelta;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Hand-driven clock. Clones share the same instant, so a test can keep
    /// one handle and give another to the engine.
    #[derive(Debug, Clone)]
    pub struct ManualClock(Rc<Cell<DateTime<Utc>>>);

    impl ManualClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self(Rc::new(Cell::new(start)))
        }

        pub fn advance_ms(&self, ms: i64) {
            self.0.set(self.0.get() + TimeDelta::milliseconds(ms));
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default())
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }
}
