//! Rate limiting logic and state management.

mod bucket;
mod descriptor;
mod registry;
pub mod rules;

pub use bucket::RateLimitBucket;
pub use descriptor::{BucketKey, EndpointKey, RequestDescriptor, Scope};
pub use registry::LimiterRegistry;
pub use rules::{RateLimitConfig, RateLimitRule, RateLimitType, ServerLimits};
