//! Retry policy for acquiring the lock.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of acquire attempts.
pub const DEFAULT_RETRY_COUNT: u32 = 6;

/// Default suspension between acquire attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Default upper bound for exponential backoff.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(300);

/// How the delay grows between attempts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// Wait the same delay after every attempt.
    #[default]
    Fixed,
    /// Double the delay after every attempt, capped at the maximum delay.
    Exponential,
}

/// Bounded polling schedule for acquire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub attempts: u32,
    /// Delay after the first failed attempt.
    pub delay: Duration,
    pub backoff: Backoff,
    /// Ceiling for exponential backoff.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Fixed-delay policy.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay,
            backoff: Backoff::Fixed,
            max_delay: DEFAULT_MAX_DELAY.max(delay),
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff, max_delay: Duration) -> Self {
        self.backoff = backoff;
        self.max_delay = max_delay;
        self
    }

    /// Delay to suspend for after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                self.delay.saturating_mul(factor).min(self.max_delay)
            }
        }
    }

    /// Sum of every suspension for a run that never succeeds.
    pub fn total_wait(&self) -> Duration {
        (1..self.attempts)
            .map(|attempt| self.delay_after(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY)
    }
}

/// Suspends the caller between acquire attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<F: Fn(Duration)> Sleeper for F {
    fn sleep(&self, duration: Duration) {
        self(duration)
    }
}
