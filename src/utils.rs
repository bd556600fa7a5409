use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation flag shared between a caller and a running search.
///
/// The search checks it between iterations and during neighbourhood passes,
/// then returns the best feasible solution found so far.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Wall-clock cutoff for a run. `None` budget never expires.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn start(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn expired(&self) -> bool {
        self.budget
            .is_some_and(|budget| self.start.elapsed() >= budget)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Non-improving iterations tolerated before the search gives up, scaled with
/// instance size.
pub fn calculate_max_no_improvement(locations_len: usize) -> usize {
    let scaling_factor = if locations_len < 50 { 15.0 } else { 9.0 };
    std::cmp::max(
        300,
        (scaling_factor * (locations_len as f64).powf(1.33)) as usize,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn zero_budget_expires_immediately() {
        assert!(Deadline::start(Some(Duration::ZERO)).expired());
        assert!(!Deadline::start(None).expired());
    }

    #[test]
    fn stagnation_window_has_a_floor() {
        assert_eq!(calculate_max_no_improvement(5), 300);
        assert!(calculate_max_no_improvement(100) > 300);
    }
}
