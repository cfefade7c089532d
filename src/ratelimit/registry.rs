//! Registry of every rate limit bucket owned by a client.

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::bucket::RateLimitBucket;
use super::descriptor::{BucketKey, RequestDescriptor, Scope};
use super::rules::{RateLimitConfig, RateLimitType, ServerLimits};

type SharedBucket = Arc<Mutex<RateLimitBucket>>;

/// Owns the per-method and application-wide buckets.
///
/// Buckets are created lazily on first use and live as long as the registry.
/// This struct is thread-safe and can be shared across multiple tasks.
pub struct LimiterRegistry {
    /// Per-method buckets indexed by (scope, endpoint key)
    method_buckets: DashMap<BucketKey, SharedBucket>,
    /// Application-wide buckets indexed by scope
    app_buckets: DashMap<Scope, SharedBucket>,
    /// Provisional limits for new buckets
    config: RateLimitConfig,
    /// Upper bound of the random delay added to every contention wait
    max_jitter: Duration,
}

impl LimiterRegistry {
    /// Create a registry with the given provisional limits.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            method_buckets: DashMap::new(),
            app_buckets: DashMap::new(),
            config,
            max_jitter: Duration::from_millis(50),
        }
    }

    /// Set the upper bound of the random delay added to contention waits.
    pub fn with_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Wait until both buckets for the descriptor grant a slot, then take it.
    ///
    /// Both buckets are checked together on every attempt; no slot is held
    /// while waiting. Dropping the returned future abandons the wait.
    pub async fn acquire(&self, descriptor: &RequestDescriptor) {
        loop {
            match self.try_acquire(descriptor) {
                Ok(()) => return,
                Err(wait) => {
                    let wait = wait + self.jitter();
                    trace!(
                        key = %descriptor.bucket_key(),
                        wait_ms = wait.as_millis() as u64,
                        "Rate limit slot unavailable, waiting"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Take a slot from both buckets if both allow it.
    ///
    /// Returns the longer of the two suggested waits otherwise.
    pub fn try_acquire(&self, descriptor: &RequestDescriptor) -> Result<(), Duration> {
        let (method, app) = self.buckets_for(descriptor);
        let now = Instant::now();

        // Always method before app, so concurrent callers lock in the same order
        let mut method = method.lock();
        let mut app = app.lock();

        match method.check(now).into_iter().chain(app.check(now)).max() {
            Some(wait) => Err(wait),
            None => {
                method.commit(now);
                app.commit(now);
                Ok(())
            }
        }
    }

    /// Feed the limits reported in a response back into both buckets.
    ///
    /// The method bucket is updated before the app bucket. A bucket whose
    /// limits header is absent is left untouched.
    pub fn update(&self, descriptor: &RequestDescriptor, headers: &HeaderMap) {
        let (method, app) = self.buckets_for(descriptor);
        let now = Instant::now();

        if let Some(limits) = ServerLimits::method(headers) {
            debug!(
                key = %descriptor.bucket_key(),
                rules = ?limits.rules,
                "Recording method rate limits"
            );
            method.lock().record_server_limits(&limits, now);
        }

        if let Some(limits) = ServerLimits::application(headers) {
            debug!(
                scope = %descriptor.scope(),
                rules = ?limits.rules,
                "Recording application rate limits"
            );
            app.lock().record_server_limits(&limits, now);
        }
    }

    /// Block the bucket a 429 response blamed until `retry_after` has passed.
    pub fn penalize(
        &self,
        descriptor: &RequestDescriptor,
        limit_type: Option<RateLimitType>,
        retry_after: Duration,
    ) {
        let (method, app) = self.buckets_for(descriptor);
        let until = Instant::now() + retry_after;

        match limit_type {
            Some(RateLimitType::Method) => method.lock().block_until(until),
            Some(RateLimitType::Application) => app.lock().block_until(until),
            Some(RateLimitType::Service) | None => return,
        }

        debug!(
            key = %descriptor.bucket_key(),
            limit_type = ?limit_type,
            retry_after_ms = retry_after.as_millis() as u64,
            "Bucket blocked after throttling response"
        );
    }

    /// Snapshot of a per-method bucket, if it exists.
    pub fn method_bucket(&self, key: &BucketKey) -> Option<RateLimitBucket> {
        self.method_buckets.get(key).map(|b| b.lock().clone())
    }

    /// Snapshot of an application-wide bucket, if it exists.
    pub fn app_bucket(&self, scope: Scope) -> Option<RateLimitBucket> {
        self.app_buckets.get(&scope).map(|b| b.lock().clone())
    }

    /// Get the number of buckets, per-method and app-wide combined.
    pub fn bucket_count(&self) -> usize {
        self.method_buckets.len() + self.app_buckets.len()
    }

    fn buckets_for(&self, descriptor: &RequestDescriptor) -> (SharedBucket, SharedBucket) {
        let key = descriptor.bucket_key();

        let method = self
            .method_buckets
            .entry(key)
            .or_insert_with(|| {
                let rules = self.config.method_rules(key.endpoint);
                debug!(key = %key, rules = ?rules, "Creating method rate limit bucket");
                Arc::new(Mutex::new(RateLimitBucket::new(rules)))
            })
            .clone();

        let app = self
            .app_buckets
            .entry(key.scope)
            .or_insert_with(|| {
                let rules = self.config.app_rules();
                debug!(scope = %key.scope, rules = ?rules, "Creating app rate limit bucket");
                Arc::new(Mutex::new(RateLimitBucket::new(rules)))
            })
            .clone();

        (method, app)
    }

    fn jitter(&self) -> Duration {
        let max = self.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max))
    }
}

impl Default for LimiterRegistry {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
