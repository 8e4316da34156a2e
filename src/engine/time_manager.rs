//! Move-time budgeting from the game clock.
//!
//! The budget is a small fraction of the remaining time plus increment, so
//! the engine never burns its clock on a single move. Iterative deepening
//! only checks the deadline between iterations, which is another reason to
//! keep the fraction small.

use std::time::Duration;

const BASE_FRACTION: f64 = 0.03;
const AGGRESSIVE_MULTIPLIER: f64 = 1.5;

/// Derives per-move search budgets from the allocated clock time.
pub struct TimeManager {
    base_fraction: f64,
    increment_factor: f64,
    aggressive: bool,
}

impl Default for TimeManager {
    fn default() -> Self {
        Self {
            base_fraction: BASE_FRACTION,
            increment_factor: 1.0,
            aggressive: false,
        }
    }
}

impl TimeManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// In aggressive mode the engine spends half again as much time per move.
    pub fn set_aggressive(&mut self, aggressive: bool) {
        self.aggressive = aggressive;
    }

    pub fn set_increment_factor(&mut self, factor: f64) {
        self.increment_factor = factor;
    }

    /// Search budget carved out of `allocated` (remaining clock plus
    /// increment for the side to move).
    #[must_use]
    pub fn budget(&self, allocated: Duration) -> Duration {
        let mut fraction = self.base_fraction;
        if self.aggressive {
            fraction *= AGGRESSIVE_MULTIPLIER;
        }
        allocated.mul_f64(fraction * self.increment_factor)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn budget_is_a_fraction_of_the_clock() {
        let manager = TimeManager::new();
        assert_eq!(
            manager.budget(Duration::from_secs(60)),
            Duration::from_millis(1800)
        );
    }

    #[test]
    fn aggressive_mode_spends_more() {
        let mut manager = TimeManager::new();
        manager.set_aggressive(true);
        assert_eq!(
            manager.budget(Duration::from_secs(60)),
            Duration::from_millis(2700)
        );
        manager.set_aggressive(false);
        assert_eq!(
            manager.budget(Duration::from_secs(60)),
            Duration::from_millis(1800)
        );
    }

    #[test]
    fn increment_factor_scales_linearly() {
        let mut manager = TimeManager::new();
        manager.set_increment_factor(2.0);
        assert_eq!(
            manager.budget(Duration::from_secs(60)),
            Duration::from_millis(3600)
        );
    }
}
