//! Double-tap protection for `record_score`.
//!
//! Not a lock: a flag with a time-based release. Once a throw is accepted
//! the guard stays engaged until `cooldown` has elapsed, so a duplicate
//! tap arriving in that window is dropped instead of counted twice.

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Default)]
pub struct ScoreGuard {
    locked_until: Option<DateTime<Utc>>,
}

impl ScoreGuard {
    pub fn is_engaged(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Engage the guard. Returns false if it was already engaged.
    pub fn try_engage(&mut self, now: DateTime<Utc>, cooldown_ms: u64) -> bool {
        if self.is_engaged(now) {
            return false;
        }
        let cooldown = i64::try_from(cooldown_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);
        self.locked_until = Some(now.checked_add_signed(cooldown).unwrap_or(DateTime::<Utc>::MAX_UTC));
        true
    }

    /// Release immediately (used when a throw is aborted).
    pub fn release(&mut self) {
        self.locked_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn blocks_within_cooldown() {
        let mut g = ScoreGuard::default();
        assert!(g.try_engage(t0(), 300));
        assert!(!g.try_engage(t0() + TimeDelta::milliseconds(299), 300));
        assert!(g.try_engage(t0() + TimeDelta::milliseconds(300), 300));
    }

    #[test]
    fn release_unblocks() {
        let mut g = ScoreGuard::default();
        g.try_engage(t0(), 300);
        g.release();
        assert!(!g.is_engaged(t0()));
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let mut g = ScoreGuard::default();
        assert!(g.try_engage(t0(), 0));
        assert!(g.try_engage(t0(), 0));
    }
}
