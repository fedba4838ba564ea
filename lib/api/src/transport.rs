//! The transport seam between the dispatcher and the network.
//!
//! `Transport` is the only place HTTP happens. The dispatcher and the
//! renewal coordinator are written against the trait, which is what lets
//! the concurrency-sensitive paths be tested against scripted in-memory
//! transports instead of a live server.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::ApiError;
use lyceum_core::Result;

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// Returns the method name on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully-assembled outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL (e.g. "/auth/me").
    pub path: String,
    /// Bearer token to attach, if any.
    pub bearer: Option<String>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

/// A response as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body; `Value::Null` when the body was empty or not JSON.
    pub body: Value,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true when the server rejected the caller's credential.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        self.status == 401
    }
}

/// Errors from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The request could not be sent or the connection broke.
    Connection { details: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Connection { details } => write!(f, "connection failure: {details}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Executes outbound requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was produced at all.
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// Production transport over reqwest.
///
/// The cookie store is enabled so the renewal cookie set by the server on
/// login travels with `POST /auth/refresh`; the cookie itself is scoped
/// and never readable by this code.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Builds a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the configured API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
            Method::Patch => self.client.patch(&url),
        };

        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connection {
                    details: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        // Non-JSON and empty bodies read as Null; the dispatcher decides
        // what a body means per endpoint.
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        Ok(TransportResponse { status, body })
    }
}
