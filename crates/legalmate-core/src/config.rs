//! Pipeline configuration shared by the analysis crates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upload size limit carried over from the ingestion service (16 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024;

/// Bounded retry with exponential backoff.
///
/// Attempt 1 runs immediately. Before attempt `n + 1` the caller waits
/// [`delay(n)`](Self::delay): `base * multiplier^(n - 1)`, clamped to
/// `[min_delay, max_delay]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    /// 3 attempts, waiting 2 s then 4 s (capped at 10 s).
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            multiplier: 2,
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Run exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after the `failed_attempt`-th failure (1-indexed).
    pub fn delay(&self, failed_attempt: u32) -> Duration {
        let exp = failed_attempt.saturating_sub(1);
        let factor = self.multiplier.checked_pow(exp).unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor);
        delay.clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }

    /// Sum of every backoff delay when all attempts fail.
    pub fn total_backoff(&self) -> Duration {
        (1..self.attempts()).map(|n| self.delay(n)).sum()
    }
}

/// Fixed generation parameters for the summarisation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 150,
            temperature: 0.2,
        }
    }
}

/// Tunables for one analysis pipeline instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on each external service call, independent of retries.
    pub call_timeout: Duration,
    /// Documents larger than this are rejected before extraction.
    pub max_document_bytes: u64,
    pub summary: SummaryParams,
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            summary: SummaryParams::default(),
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_two_then_four_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
        assert_eq!(policy.total_backoff(), Duration::from_secs(6));
    }

    #[test]
    fn delay_capped_at_max() {
        let policy = RetryPolicy {
            max_attempts: 10,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay(3), Duration::from_secs(8));
        assert_eq!(policy.delay(4), Duration::from_secs(10));
        assert_eq!(policy.delay(40), Duration::from_secs(10));
    }

    #[test]
    fn delay_floored_at_min() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay(1), Duration::from_secs(2));
    }

    #[test]
    fn zero_attempts_means_one() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.total_backoff(), Duration::ZERO);
    }

    #[test]
    fn pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_document_bytes, 16 * 1024 * 1024);
        assert_eq!(config.summary.max_output_tokens, 150);
        assert_eq!(config.call_timeout, Duration::from_secs(30));
    }
}
