//! HTTP transport seam for the batching destinations
//!
//! The batching family talks to its endpoints through [`HttpTransport`]
//! instead of a concrete client, so tests can count and fail requests
//! without a server.

use crate::core::DeliveryError;
use std::time::Duration;

/// Default request timeout for HTTP destinations.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// One outbound JSON POST.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// What came back.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Blocking HTTP POST seam.
///
/// `Err` means the request never produced a response (connect failure,
/// timeout); a response with a failure status is returned as `Ok` and judged
/// by the caller.
pub trait HttpTransport: Send {
    fn post(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, DeliveryError>;
}

/// Production transport over a blocking [`reqwest`] client.
#[cfg(feature = "http")]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl HttpTransport for ReqwestTransport {
    fn post(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, DeliveryError> {
        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .send()
            .map_err(|err| DeliveryError::rejected(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}
