//! Retry backoff policy.
//!
//! A [`BackoffConfig`] is pure with respect to call-scoped inputs: the
//! pipeline asks it whether a status qualifies for retry and how long to
//! wait before a given attempt. Absent config means a single attempt.

use std::collections::BTreeSet;
use std::time::Duration;

/// Delay progression between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffMode {
    /// Constant delay equal to the initial delay.
    #[default]
    Fixed,
    /// Delay doubles after each retried attempt, starting from the
    /// initial delay.
    Exponential,
}

/// Retry/backoff configuration.
///
/// The pipeline attempts once unconditionally, then retries up to
/// `max_retries` additional times, stopping at the first success, the
/// first non-retryable failure, or exhaustion of the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// HTTP status codes that qualify for retry.
    pub retry_on: BTreeSet<u16>,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Delay progression mode.
    pub mode: BackoffMode,
}

impl BackoffConfig {
    /// Fixed-delay backoff retrying on the given status codes.
    #[must_use]
    pub fn fixed(
        max_retries: u32,
        retry_on: impl IntoIterator<Item = u16>,
        initial_delay: Duration,
    ) -> Self {
        Self {
            max_retries,
            retry_on: retry_on.into_iter().collect(),
            initial_delay,
            mode: BackoffMode::Fixed,
        }
    }

    /// Exponential backoff retrying on the given status codes.
    #[must_use]
    pub fn exponential(
        max_retries: u32,
        retry_on: impl IntoIterator<Item = u16>,
        initial_delay: Duration,
    ) -> Self {
        Self {
            max_retries,
            retry_on: retry_on.into_iter().collect(),
            initial_delay,
            mode: BackoffMode::Exponential,
        }
    }

    /// Returns `true` if the status code qualifies for retry.
    ///
    /// Retry decisions are based solely on status membership; transport
    /// failures never reach this predicate.
    #[must_use]
    pub fn retries(&self, status: u16) -> bool {
        self.retry_on.contains(&status)
    }

    /// Delay to wait before retry `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.mode {
            BackoffMode::Fixed => self.initial_delay,
            BackoffMode::Exponential => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                self.initial_delay.saturating_mul(factor)
            }
        }
    }
}
