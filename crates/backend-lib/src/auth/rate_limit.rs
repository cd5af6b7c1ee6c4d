// ============================
// sabha-backend-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for sign-in attempts, keyed by account email.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::warn;

/// Tracked state for one account
#[derive(Debug, Clone)]
struct AttemptEntry {
    failures: u32,
    locked_until: Option<Instant>,
}

/// Locks an account out after too many failed sign-ins.
#[derive(Debug)]
pub struct SignInRateLimiter {
    attempts: DashMap<String, AttemptEntry>,
    max_attempts: u32,
    lockout: Duration,
}

impl SignInRateLimiter {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            max_attempts,
            lockout,
        }
    }

    /// Record a failed sign-in for this email.
    pub fn record_failure(&self, email: &str) {
        let now = Instant::now();
        let mut entry = self
            .attempts
            .entry(email.to_string())
            .or_insert(AttemptEntry {
                failures: 0,
                locked_until: None,
            });

        // an expired lockout resets the counter
        if matches!(entry.locked_until, Some(until) if now >= until) {
            entry.failures = 0;
            entry.locked_until = None;
        }

        entry.failures += 1;
        if entry.failures >= self.max_attempts {
            entry.locked_until = Some(now + self.lockout);
            warn!(email, "account locked out after repeated sign-in failures");
        }
    }

    /// Clear the tracked state after a successful sign-in.
    pub fn record_success(&self, email: &str) {
        self.attempts.remove(email);
    }

    /// Whether this email is currently allowed to attempt a sign-in.
    pub fn check(&self, email: &str) -> bool {
        match self.attempts.get(email) {
            Some(entry) => match entry.locked_until {
                Some(until) => Instant::now() >= until,
                None => true,
            },
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locks_after_max_attempts() {
        let limiter = SignInRateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.check("a@example.com"));
        for _ in 0..3 {
            limiter.record_failure("a@example.com");
        }
        assert!(!limiter.check("a@example.com"));
        // other accounts unaffected
        assert!(limiter.check("b@example.com"));
    }

    #[test]
    fn test_success_resets_counter() {
        let limiter = SignInRateLimiter::new(2, Duration::from_secs(60));
        limiter.record_failure("a@example.com");
        limiter.record_success("a@example.com");
        limiter.record_failure("a@example.com");
        assert!(limiter.check("a@example.com"));
    }

    #[test]
    fn test_lockout_expires() {
        let limiter = SignInRateLimiter::new(1, Duration::from_millis(0));
        limiter.record_failure("a@example.com");
        // zero-length lockout expires immediately
        assert!(limiter.check("a@example.com"));
    }
}
