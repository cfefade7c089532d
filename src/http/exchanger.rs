//! Builds outbound requests from descriptors and performs single exchanges.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::sync::Arc;
use tracing::trace;
use url::Url;

use super::transport::{HttpRequest, RawResponse, Transport, TransportError};
use crate::error::{ApiError, ErrorKind};
use crate::ratelimit::RequestDescriptor;

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-riot-token";

const JSON: &str = "application/json";

/// Performs one network exchange for an already rate-cleared descriptor.
pub struct HttpExchanger {
    transport: Arc<dyn Transport>,
    api_key: String,
    /// Replaces the per-scope host; `{scope}` is substituted
    base_url: Option<String>,
}

impl HttpExchanger {
    /// Create an exchanger that sends through `transport` with the given credential.
    pub fn new(transport: Arc<dyn Transport>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Send every scope to the given base URL instead of the public host.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full request: scope host, path, encoded query and headers.
    pub fn prepare(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ApiError> {
        let base = match &self.base_url {
            Some(template) => template.replace("{scope}", descriptor.scope().as_str()),
            None => descriptor.scope().base_url(),
        };

        let mut url = Url::parse(&format!("{}{}", base.trim_end_matches('/'), descriptor.path()))
            .map_err(|e| invalid(format!("invalid request URL: {}", e)))?;
        if !descriptor.query().is_empty() {
            url.query_pairs_mut().extend_pairs(descriptor.query());
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| invalid("API key is not a valid header value"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        if descriptor.body().is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        }

        Ok(HttpRequest {
            method: descriptor.method().clone(),
            url,
            headers,
            body: descriptor.body().cloned(),
        })
    }

    /// Perform exactly one exchange.
    pub async fn exchange(&self, request: HttpRequest) -> Result<RawResponse, TransportError> {
        trace!(method = %request.method, url = %request.url, "Sending request");
        self.transport.send(request).await
    }
}

fn invalid(message: impl Into<String>) -> ApiError {
    ApiError::new(ErrorKind::InvalidRequest, None, message)
}
