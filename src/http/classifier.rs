//! Maps HTTP statuses and transport failures to dispatch outcomes.

use std::time::Duration;

use super::transport::{RawResponse, TransportError};
use crate::error::{error_for_status, ApiError};
use crate::ratelimit::rules::{retry_after, RateLimitType};

/// What the dispatcher should do with one exchange.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// 200: decode the body
    Success(RawResponse),
    /// Try again after `wait`, unless the attempt cap is reached
    Retryable {
        reason: ApiError,
        wait: Duration,
        /// Bucket the server blamed, for 429 responses carrying `Retry-After`
        blame: Option<RateLimitType>,
    },
    /// Give up and return the error to the caller
    Fatal(ApiError),
}

/// Classification policy with its fallback waits.
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    /// Wait for 5xx, and for 429 without `Retry-After`
    fallback_wait: Duration,
    /// Wait after a transport failure
    transport_backoff: Duration,
}

impl ResponseClassifier {
    /// Create a classifier with the given retry waits.
    pub fn new(fallback_wait: Duration, transport_backoff: Duration) -> Self {
        Self {
            fallback_wait,
            transport_backoff,
        }
    }

    /// Classify a response by status. Only 200 is a success.
    pub fn classify(&self, response: RawResponse) -> DispatchOutcome {
        match response.status {
            200 => DispatchOutcome::Success(response),
            429 => {
                let advertised = retry_after(&response.headers);
                DispatchOutcome::Retryable {
                    reason: error_for_status(429),
                    wait: advertised.unwrap_or(self.fallback_wait),
                    blame: advertised.and(RateLimitType::from_headers(&response.headers)),
                }
            }
            status => {
                let error = error_for_status(status);
                if error.kind().is_retryable() {
                    DispatchOutcome::Retryable {
                        reason: error,
                        wait: self.fallback_wait,
                        blame: None,
                    }
                } else {
                    DispatchOutcome::Fatal(error)
                }
            }
        }
    }

    /// Transport failures are always retryable.
    pub fn classify_transport(&self, err: &TransportError) -> DispatchOutcome {
        DispatchOutcome::Retryable {
            reason: ApiError::transport(err.to_string()),
            wait: self.transport_backoff,
            blame: None,
        }
    }
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use bytes::Bytes;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn response(status: u16, headers: &[(&'static str, &'static str)]) -> RawResponse {
        let mut map = HeaderMap::new();
        for (k, v) in headers {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        RawResponse {
            status,
            headers: map,
            body: Bytes::new(),
        }
    }

    fn classifier() -> ResponseClassifier {
        ResponseClassifier::new(Duration::from_millis(1500), Duration::from_millis(700))
    }

    #[test]
    fn test_success() {
        assert!(matches!(
            classifier().classify(response(200, &[])),
            DispatchOutcome::Success(_)
        ));
    }

    #[test]
    fn test_throttled_uses_retry_after() {
        let outcome = classifier().classify(response(
            429,
            &[("retry-after", "2"), ("x-rate-limit-type", "application")],
        ));
        match outcome {
            DispatchOutcome::Retryable { reason, wait, blame } => {
                assert_eq!(reason.kind(), ErrorKind::RateLimitExceeded);
                assert_eq!(wait, Duration::from_secs(2));
                assert_eq!(blame, Some(RateLimitType::Application));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_throttled_without_retry_after_uses_fallback() {
        let outcome =
            classifier().classify(response(429, &[("x-rate-limit-type", "method")]));
        match outcome {
            DispatchOutcome::Retryable { wait, blame, .. } => {
                assert_eq!(wait, Duration::from_millis(1500));
                assert_eq!(blame, None);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_server_faults_are_retryable() {
        for status in [500, 502, 503, 504] {
            let outcome = classifier().classify(response(status, &[]));
            match outcome {
                DispatchOutcome::Retryable { reason, wait, .. } => {
                    assert_eq!(reason.status(), Some(status));
                    assert_eq!(wait, Duration::from_millis(1500));
                }
                other => panic!("unexpected outcome for {}: {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_client_faults_are_fatal() {
        let expected = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (405, ErrorKind::MethodNotAllowed),
            (408, ErrorKind::RequestTimeout),
            (415, ErrorKind::UnsupportedMediaType),
        ];
        for (status, kind) in expected {
            match classifier().classify(response(status, &[])) {
                DispatchOutcome::Fatal(err) => assert_eq!(err.kind(), kind),
                other => panic!("unexpected outcome for {}: {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_unlisted_statuses_are_fatal_unknown() {
        for status in [201, 204, 301, 418, 501] {
            match classifier().classify(response(status, &[])) {
                DispatchOutcome::Fatal(err) => {
                    assert_eq!(err.kind(), ErrorKind::Unknown);
                    assert_eq!(err.status(), Some(status));
                }
                other => panic!("unexpected outcome for {}: {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_transport_failure_is_retryable() {
        let outcome =
            classifier().classify_transport(&TransportError::Timeout("slow".to_string()));
        match outcome {
            DispatchOutcome::Retryable { reason, wait, .. } => {
                assert_eq!(reason.kind(), ErrorKind::Transport);
                assert_eq!(reason.status(), None);
                assert_eq!(wait, Duration::from_millis(700));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
