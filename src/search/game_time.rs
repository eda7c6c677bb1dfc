use std::time::{Duration, Instant};

/// A side's clock, for callers that want the engine to pick its own budget
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GameTime {
    /// Time remaining for the side to move
    pub remaining: Duration,
    /// Time added after each move
    pub increment: Duration,
}

impl GameTime {
    pub fn new(remaining: Duration, increment: Duration) -> Self {
        Self { remaining, increment }
    }

    /// Calculates a recommended amount of time to spend on a given search.
    /// Never more than what is left on the clock
    pub fn budget(&self) -> Duration {
        (self.remaining / 20 + self.increment / 2).min(self.remaining)
    }
}

/// Deadline for one search. It only starts counting once armed, which iterative deepening does
/// after the first depth completes
#[derive(Copy, Clone, Debug)]
pub struct SearchTimer {
    start: Instant,
    budget: Option<Duration>,
    armed: bool,
}

impl SearchTimer {
    pub fn new(budget: Option<Duration>) -> Self {
        Self { start: Instant::now(), budget, armed: false }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns true if engine has used the max time allotted to this search
    pub fn expired(&self) -> bool {
        match self.budget {
            Some(budget) => self.armed && self.start.elapsed() >= budget,
            None => false,
        }
    }
}

#[cfg(test)]
mod time_tests {
    use super::*;

    #[test]
    fn test_budget() {
        let clock = GameTime::new(Duration::from_secs(60), Duration::from_secs(2));
        assert_eq!(clock.budget(), Duration::from_secs(4));
        let low = GameTime::new(Duration::from_millis(100), Duration::from_secs(10));
        assert_eq!(low.budget(), Duration::from_millis(100));
        assert_eq!(GameTime::default().budget(), Duration::ZERO);
    }

    #[test]
    fn test_timer_needs_arming() {
        let mut timer = SearchTimer::new(Some(Duration::ZERO));
        assert!(!timer.expired());
        timer.arm();
        assert!(timer.expired());

        let mut unlimited = SearchTimer::new(None);
        unlimited.arm();
        assert!(!unlimited.expired());
    }
}
