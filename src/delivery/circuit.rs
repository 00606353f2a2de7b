use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

/// One-shot breaker for listing delivery. Once tripped it stays open until the
/// process restarts.
#[derive(Debug, Default)]
pub struct CircuitBreaker {
    open: AtomicBool,
    reason: Mutex<Option<String>>,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Opens the breaker. Returns `true` only for the call that actually tripped it.
    pub fn trip(&self, reason: impl Into<String>) -> bool {
        let mut slot = self.reason.lock();
        if self.open.swap(true, Ordering::SeqCst) {
            return false;
        }
        *slot = Some(reason.into());
        true
    }

    pub fn reason(&self) -> Option<String> {
        self.reason.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let breaker = CircuitBreaker::new();
        assert!(!breaker.is_open());
        assert!(breaker.reason().is_none());
    }

    #[test]
    fn first_trip_wins_and_sticks() {
        let breaker = CircuitBreaker::new();
        assert!(breaker.trip("403 Missing Access"));
        assert!(!breaker.trip("second failure"));
        assert!(breaker.is_open());
        assert_eq!(breaker.reason().as_deref(), Some("403 Missing Access"));
    }
}
