//! riot-api-client - Rate-limited typed client for the Riot Games API
//!
//! Every endpoint method hands a request descriptor to a shared dispatcher,
//! which waits for both the application-wide and per-method rate limit
//! budgets of the target region, performs the exchange, retries throttled
//! and failed calls, and decodes the JSON body into a typed model.

pub mod client;
pub mod config;
pub mod constants;
pub mod decode;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod models;
pub mod ratelimit;

pub use client::RiotClient;
pub use config::ClientConfig;
pub use dispatch::Dispatcher;
pub use error::{ApiError, Error, ErrorCategory, ErrorKind, Result};
