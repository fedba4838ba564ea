//! The request dispatcher.
//!
//! Every screen calls the API through [`ApiClient`]; nothing else may
//! talk to the transport. The dispatcher attaches the current bearer
//! credential, hands 401s to the renewal coordinator, and re-issues the
//! original request exactly once with the renewed credential.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::renewal::RenewalCoordinator;
use crate::transport::{HttpTransport, Method, Transport, TransportRequest};
use lyceum_core::Result;
use lyceum_session::SessionHandle;

/// An outbound API call before credential attachment.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    bearer_override: Option<String>,
}

impl ApiRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer_override: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attaches a JSON body.
    pub fn with_json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(|e| ApiError::Decode {
            details: e.to_string(),
        })?);
        Ok(self)
    }

    /// Carries an explicit bearer instead of reading the store.
    ///
    /// Used by the logout notification, which runs after the store has
    /// been cleared.
    pub(crate) fn with_bearer_override(mut self, token: String) -> Self {
        self.bearer_override = Some(token);
        self
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }
}

/// A settled API response.
///
/// Non-2xx statuses are data, not errors: listing screens inspect the
/// status themselves. Only transport failures and session death surface
/// as errors from the dispatcher.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: Value,
}

impl ApiResponse {
    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the raw JSON body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Decodes the body into `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            ApiError::Decode {
                details: e.to_string(),
            }
            .into()
        })
    }
}

/// The configured API client every screen uses.
///
/// Cheap to clone; clones share the transport, session handle, and
/// renewal coordinator.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionHandle,
    renewal: RenewalCoordinator,
}

impl ApiClient {
    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: SessionHandle) -> Self {
        let renewal = RenewalCoordinator::new(Arc::clone(&transport), session.clone());
        Self {
            transport,
            session,
            renewal,
        }
    }

    /// Creates a client over HTTP from configuration.
    pub fn from_config(config: &ClientConfig, session: SessionHandle) -> Result<Self, ApiError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config)?);
        let renewal = RenewalCoordinator::new(Arc::clone(&transport), session.clone())
            .with_timeout(std::time::Duration::from_secs(config.renewal_timeout_seconds));
        Ok(Self {
            transport,
            session,
            renewal,
        })
    }

    /// Returns the session handle this client reads credentials from.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Returns the renewal coordinator.
    #[must_use]
    pub fn renewal(&self) -> &RenewalCoordinator {
        &self.renewal
    }

    /// Dispatches a request with credential attachment and transparent
    /// renewal.
    ///
    /// On a 401 the renewal coordinator is consulted and the request is
    /// re-issued exactly once with the fresh credential; a second 401
    /// rejects with [`ApiError::CredentialRejected`]. All other statuses
    /// are returned to the caller unchanged.
    ///
    /// # Errors
    ///
    /// `Transport`/`Timeout` for transient failures (no session impact),
    /// `SessionExpired` when renewal failed and the session is gone,
    /// `CredentialRejected` when the retry budget is spent.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let bearer = self.bearer_for(&request);

        let response = self.execute(&request, bearer).await?;
        if !response.is_auth_failure() {
            return Ok(ApiResponse {
                status: response.status,
                body: response.body,
            });
        }

        debug!("credential rejected, renewing");
        let renewed = self.renewal.renew().await?;

        let retried = self
            .execute(&request, Some(renewed.token().to_string()))
            .await?;
        if retried.is_auth_failure() {
            warn!("renewed credential rejected; giving up");
            return Err(ApiError::CredentialRejected.into());
        }

        Ok(ApiResponse {
            status: retried.status,
            body: retried.body,
        })
    }

    /// Dispatches a request without renewal-on-401.
    ///
    /// Auth endpoints use this path: a rejected login must not trigger a
    /// renewal round of its own.
    pub(crate) async fn send_without_renewal(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let bearer = self.bearer_for(&request);

        let response = self.execute(&request, bearer).await?;
        Ok(ApiResponse {
            status: response.status,
            body: response.body,
        })
    }

    fn bearer_for(&self, request: &ApiRequest) -> Option<String> {
        request.bearer_override.clone().or_else(|| {
            self.session
                .credentials()
                .get()
                .map(|credential| credential.token().to_string())
        })
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<String>,
    ) -> Result<crate::transport::TransportResponse, ApiError> {
        let outbound = TransportRequest {
            method: request.method,
            path: request.path.clone(),
            bearer,
            body: request.body.clone(),
        };

        self.transport.execute(outbound).await.map_err(|e| match e {
            crate::transport::TransportError::Timeout => ApiError::Timeout.into(),
            crate::transport::TransportError::Connection { details } => {
                ApiError::Transport { details }.into()
            }
        })
    }
}
