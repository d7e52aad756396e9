use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Colour;

/// Remaining time per side as pushed in by the session. The engine only
/// stores and decrements it and never runs a timer.
///
/// A side whose time was never set is untimed and can not flag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    remaining_millis: [Option<i64>; Colour::NUM],
    last_update: Option<DateTime<Utc>>,
}

impl Clock {
    pub fn new(initial_millis: i64) -> Self {
        Self { remaining_millis: [Some(initial_millis); Colour::NUM], last_update: None }
    }

    /// Time left for `colour`, `None` when untimed
    #[inline]
    pub fn remaining(&self, colour: Colour) -> Option<i64> {
        self.remaining_millis[colour.index()]
    }

    /// When the session last set a clock
    #[inline]
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn set(&mut self, colour: Colour, millis: i64, at: DateTime<Utc>) {
        self.remaining_millis[colour.index()] = Some(millis);
        self.last_update = Some(at);
    }

    /// Subtracts `delta_millis`, saturating instead of wrapping. Untimed
    /// sides are left alone.
    pub fn elapse(&mut self, colour: Colour, delta_millis: i64) {
        if let Some(remaining) = &mut self.remaining_millis[colour.index()] {
            *remaining = remaining.saturating_sub(delta_millis);
        }
    }

    #[inline]
    pub fn is_flagged(&self, colour: Colour) -> bool {
        self.remaining(colour).is_some_and(|millis| millis <= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapse_and_flag() {
        let mut clock = Clock::new(1_000);
        clock.elapse(Colour::White, 400);
        assert_eq!(clock.remaining(Colour::White), Some(600));
        assert_eq!(clock.remaining(Colour::Black), Some(1_000));
        assert!(!clock.is_flagged(Colour::White));

        clock.elapse(Colour::White, 600);
        assert!(clock.is_flagged(Colour::White));
    }

    #[test]
    fn test_untimed_never_flags() {
        let mut clock = Clock::default();
        clock.elapse(Colour::White, 10_000);
        assert_eq!(clock.remaining(Colour::White), None);
        assert!(!clock.is_flagged(Colour::White));
        assert!(!clock.is_flagged(Colour::Black));
    }

    #[test]
    fn test_set_stamps_time() {
        let mut clock = Clock::default();
        let now = Utc::now();
        clock.set(Colour::Black, 5_000, now);
        assert_eq!(clock.remaining(Colour::Black), Some(5_000));
        assert_eq!(clock.last_update(), Some(now));
        assert!(!clock.is_flagged(Colour::White));
    }
}
