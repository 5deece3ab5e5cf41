//! Retry policy
//!
//! The policy is data: a retry budget plus per-class backoff bases. The
//! request executor drives a plain loop against it, so changing the policy
//! never means changing control flow.

use std::time::Duration;

use crate::error::ApiError;

/// Bounded retry policy for transient failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries per failure class (initial attempt not counted)
    pub max_retries: u32,
    /// Base backoff for transient 5xx responses, grows linearly per attempt
    pub server_backoff: Duration,
    /// Fixed backoff after a timed-out attempt
    pub timeout_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            server_backoff: Duration::from_millis(1000),
            timeout_backoff: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (0-based).
    ///
    /// `None` means the error is not retryable or the budget for its class
    /// is exhausted; the caller must propagate.
    pub fn backoff(&self, error: &ApiError, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        match error {
            e if e.is_transient_server() => Some(self.server_backoff * (attempt + 1)),
            ApiError::Timeout => Some(self.timeout_backoff),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_backoff_grows_linearly() {
        let policy = RetryPolicy::default();
        let err = ApiError::server_error(500, "boom");
        assert_eq!(policy.backoff(&err, 0), Some(Duration::from_millis(1000)));
        assert_eq!(policy.backoff(&err, 1), Some(Duration::from_millis(2000)));
        assert_eq!(policy.backoff(&err, 2), None);
    }

    #[test]
    fn test_timeout_backoff_is_fixed() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.backoff(&ApiError::Timeout, 0),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(
            policy.backoff(&ApiError::Timeout, 1),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(policy.backoff(&ApiError::Timeout, 2), None);
    }

    #[test]
    fn test_non_retryable_errors() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(&ApiError::server_error(404, "missing"), 0), None);
        assert_eq!(policy.backoff(&ApiError::TokenExpired, 0), None);
        assert_eq!(policy.backoff(&ApiError::Connection("refused".into()), 0), None);
    }
}
