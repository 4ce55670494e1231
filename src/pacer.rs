use std::time::{Duration, Instant};

/// Caps how often a generation can be advanced.
///
/// The pacer only ever waits; a generation that takes longer than the budget
/// is neither skipped nor caught up on.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    budget: Duration,
}

impl Pacer {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// Time left in the budget after `elapsed`, if any
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget.checked_sub(elapsed).filter(|left| !left.is_zero())
    }

    /// Block until the budget measured from `started` is used up.
    /// Returns how long the thread slept.
    pub fn pace(&self, started: Instant) -> Duration {
        let elapsed = started.elapsed();
        match self.remaining(elapsed) {
            Some(left) => {
                log::trace!("Generation took {:?}, sleeping {:?}", elapsed, left);
                std::thread::sleep(left);
                left
            }
            None => {
                log::trace!("Generation took {:?}, over budget {:?}", elapsed, self.budget);
                Duration::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sixty_hz() -> Pacer {
        Pacer::new(Duration::from_secs_f64(1.0 / 60.0))
    }

    #[test]
    fn remaining_is_budget_minus_elapsed() {
        let pacer = Pacer::new(Duration::from_millis(16));
        assert_eq!(pacer.remaining(Duration::ZERO), Some(Duration::from_millis(16)));
        assert_eq!(pacer.remaining(Duration::from_millis(10)), Some(Duration::from_millis(6)));
    }

    #[test]
    fn no_wait_when_over_budget() {
        let pacer = Pacer::new(Duration::from_millis(16));
        assert_eq!(pacer.remaining(Duration::from_millis(16)), None);
        assert_eq!(pacer.remaining(Duration::from_millis(40)), None);

        let started = Instant::now() - Duration::from_millis(40);
        assert_eq!(pacer.pace(started), Duration::ZERO);
    }

    #[test]
    fn hundred_idle_frames_take_at_least_hundred_budgets() {
        let pacer = sixty_hz();
        let begin = Instant::now();
        for _ in 0..100 {
            let frame = Instant::now();
            pacer.pace(frame);
        }
        let total = begin.elapsed();
        assert!(
            total >= Duration::from_secs_f64(100.0 / 60.0) - Duration::from_millis(5),
            "100 frames finished in {:?}",
            total
        );
    }
}
