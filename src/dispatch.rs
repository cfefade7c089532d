//! The dispatcher: rate-limit acquisition, exchange, classification,
//! retries and decoding for every API call.
//!
//! One call moves through these states:
//!
//! ```text
//! Idle -> Acquiring -> InFlight -> Classifying -+-> Decoding -> Done
//!            ^                                  |
//!            +---------- Retrying <-------------+-> Failed
//! ```
//!
//! Waiting for a slot and waiting out a retry are the only suspension
//! points. Dropping the future at either point, or while the exchange is in
//! flight, abandons the call without touching limiter state.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::DispatchConfig;
use crate::decode::decode;
use crate::error::ApiError;
use crate::http::{DispatchOutcome, HttpExchanger, RawResponse, ResponseClassifier};
use crate::ratelimit::{LimiterRegistry, RequestDescriptor};

/// Default total attempts per call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Shared dispatch routine behind every endpoint method.
pub struct Dispatcher {
    registry: Arc<LimiterRegistry>,
    exchanger: HttpExchanger,
    classifier: ResponseClassifier,
    max_attempts: u32,
    deadline: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher with default retry settings and no deadline.
    pub fn new(registry: Arc<LimiterRegistry>, exchanger: HttpExchanger) -> Self {
        Self {
            registry,
            exchanger,
            classifier: ResponseClassifier::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            deadline: None,
        }
    }

    /// Create a dispatcher from configuration.
    pub fn with_config(
        registry: Arc<LimiterRegistry>,
        exchanger: HttpExchanger,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            registry,
            exchanger,
            classifier: ResponseClassifier::new(
                config.retry_fallback(),
                config.transport_backoff(),
            ),
            max_attempts: config.max_attempts.max(1),
            deadline: config.deadline(),
        }
    }

    /// The limiter registry consulted before every exchange.
    pub fn registry(&self) -> &Arc<LimiterRegistry> {
        &self.registry
    }

    /// Perform the call and return the raw successful response.
    pub async fn dispatch(&self, descriptor: &RequestDescriptor) -> Result<RawResponse, ApiError> {
        match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, self.run(descriptor)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        key = %descriptor.bucket_key(),
                        deadline_ms = deadline.as_millis() as u64,
                        "Call abandoned at deadline"
                    );
                    Err(ApiError::deadline_exceeded())
                }
            },
            None => self.run(descriptor).await,
        }
    }

    /// Perform the call and decode the body into `T`.
    pub async fn dispatch_and_decode<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(descriptor).await?;
        decode(&response)
    }

    async fn run(&self, descriptor: &RequestDescriptor) -> Result<RawResponse, ApiError> {
        let request = self.exchanger.prepare(descriptor)?;
        let mut attempt = 0;

        loop {
            attempt += 1;

            self.registry.acquire(descriptor).await;

            let outcome = match self.exchanger.exchange(request.clone()).await {
                Ok(response) => {
                    self.registry.update(descriptor, &response.headers);
                    self.classifier.classify(response)
                }
                Err(err) => self.classifier.classify_transport(&err),
            };

            match outcome {
                DispatchOutcome::Success(response) => return Ok(response),
                DispatchOutcome::Fatal(error) => {
                    debug!(
                        key = %descriptor.bucket_key(),
                        status = ?error.status(),
                        error = %error,
                        "Call failed"
                    );
                    return Err(error);
                }
                DispatchOutcome::Retryable { reason, wait, blame } => {
                    if blame.is_some() {
                        self.registry.penalize(descriptor, blame, wait);
                    }

                    if attempt >= self.max_attempts {
                        warn!(
                            key = %descriptor.bucket_key(),
                            attempts = attempt,
                            error = %reason,
                            "Giving up after retryable failures"
                        );
                        return Err(reason);
                    }

                    debug!(
                        key = %descriptor.bucket_key(),
                        attempt = attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %reason,
                        "Retrying call"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
