//! Reconnect backoff policy

use std::time::Duration;

/// Bounded exponential backoff for reconnect attempts.
///
/// The delay doubles with every failed attempt and never exceeds the
/// ceiling, so a device that stays away (powered off overnight) is polled
/// at a steady slow rate instead of hammering the kernel.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Delay after the first failed attempt
    pub initial: Duration,
    /// Upper bound for the delay
    pub ceiling: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            ceiling: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before retry `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.initial.saturating_mul(1u32 << shift).min(self.ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_uses_initial_delay() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_secs(1));
    }

    #[test]
    fn test_delay_doubles_until_ceiling() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay(2), Duration::from_secs(2));
        assert_eq!(policy.delay(3), Duration::from_secs(4));
        assert_eq!(policy.delay(5), Duration::from_secs(16));
        assert_eq!(policy.delay(6), Duration::from_secs(30));
        assert_eq!(policy.delay(100), Duration::from_secs(30));
    }

    #[test]
    fn test_delays_are_monotonically_non_decreasing() {
        let policy = ReconnectPolicy::default();
        let mut last = Duration::ZERO;
        for attempt in 1..200 {
            let delay = policy.delay(attempt);
            assert!(delay >= last, "delay shrank at attempt {}", attempt);
            assert!(delay <= policy.ceiling);
            last = delay;
        }
    }
}
