use std::time::Duration;

use thiserror::Error;

/// Failure modes of a remote inference call.
///
/// `MalformedInput` is the only variant that skips the retry loop entirely;
/// `ModelLoading` retries on a longer backoff curve than everything else.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network or HTTP failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// HTTP 429 from the endpoint
    #[error("rate limit exceeded, retry later")]
    RateLimited,

    /// HTTP 401 from the endpoint
    #[error("invalid API token")]
    InvalidToken,

    /// HTTP 503: the model is still loading
    #[error("model is loading")]
    ModelLoading,

    /// The request itself was rejected (oversized audio, bad filename)
    #[error("input rejected: {0}")]
    MalformedInput(String),

    /// The response body could not be parsed
    #[error("could not parse model response: {0}")]
    Parse(String),
}

impl RemoteError {
    /// Whether this failure should bypass retries and go straight to fallback
    pub fn skips_retry(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }

    /// Backoff before retry `attempt` (0-based).
    /// Model loading waits 2^(attempt+1) seconds (2s, 4s, 8s); every other
    /// retryable failure waits 2^attempt seconds (1s, 2s, 4s).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = match self {
            Self::ModelLoading => attempt + 1,
            _ => attempt,
        };
        Duration::from_secs(1u64 << exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_curves() {
        let loading = RemoteError::ModelLoading;
        assert_eq!(loading.backoff(0), Duration::from_secs(2));
        assert_eq!(loading.backoff(1), Duration::from_secs(4));
        assert_eq!(loading.backoff(2), Duration::from_secs(8));

        let transport = RemoteError::Transport("connection reset".into());
        assert_eq!(transport.backoff(0), Duration::from_secs(1));
        assert_eq!(transport.backoff(1), Duration::from_secs(2));
        assert_eq!(transport.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn test_only_malformed_input_skips_retry() {
        assert!(RemoteError::MalformedInput("file name too long".into()).skips_retry());
        assert!(!RemoteError::RateLimited.skips_retry());
        assert!(!RemoteError::ModelLoading.skips_retry());
        assert!(!RemoteError::InvalidToken.skips_retry());
        assert!(!RemoteError::Parse("truncated".into()).skips_retry());
    }
}
