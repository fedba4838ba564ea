//! Single-flight credential renewal.
//!
//! However many requests fail with a 401 in the same instant, at most one
//! `POST /auth/refresh` call is outstanding at any time. The first caller
//! installs a shared future; everyone arriving while it runs awaits the
//! same future and observes its single outcome. The credential store is
//! written before the shared future resolves, so any caller that sees
//! success can immediately read the fresh credential. A failed renewal is
//! fatal: store cleared, session cleared, redirect broadcast, no retry.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::endpoints::CredentialGrant;
use crate::error::ApiError;
use crate::transport::{Method, Transport, TransportRequest};
use lyceum_core::Result;
use lyceum_session::{AccessCredential, SessionHandle};

/// The renewal outcome shared by every caller of one round.
type RenewalFuture = Shared<BoxFuture<'static, std::result::Result<AccessCredential, ApiError>>>;

const REFRESH_PATH: &str = "/auth/refresh";

/// Coordinates credential renewal across concurrent callers.
#[derive(Clone)]
pub struct RenewalCoordinator {
    transport: Arc<dyn Transport>,
    session: SessionHandle,
    in_flight: Arc<Mutex<Option<RenewalFuture>>>,
    timeout: Duration,
}

impl RenewalCoordinator {
    /// Creates a coordinator with the default renewal timeout.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, session: SessionHandle) -> Self {
        Self {
            transport,
            session,
            in_flight: Arc::new(Mutex::new(None)),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the renewal timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exchanges the server-held renewal cookie for a fresh credential.
    ///
    /// Joins the in-flight renewal round if one exists; otherwise starts
    /// one. Every caller of a round receives the same outcome.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::SessionExpired` when renewal fails; by then the
    /// session has already been torn down.
    #[instrument(skip(self))]
    pub async fn renew(&self) -> Result<AccessCredential, ApiError> {
        let fut = {
            let mut slot = self.in_flight.lock().await;
            match slot.as_ref() {
                Some(in_flight) => {
                    debug!("joining in-flight renewal");
                    in_flight.clone()
                }
                None => {
                    let fut = Self::drive(
                        Arc::clone(&self.transport),
                        self.session.clone(),
                        self.timeout,
                    )
                    .boxed()
                    .shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };

        let outcome = fut.clone().await;

        // Free the slot so the next expiry can start a fresh round. Only
        // the round we awaited may be cleared; a later round may already
        // occupy the slot.
        {
            let mut slot = self.in_flight.lock().await;
            if slot.as_ref().is_some_and(|current| current.ptr_eq(&fut)) {
                *slot = None;
            }
        }

        outcome.map_err(Into::into)
    }

    /// The single renewal round.
    ///
    /// Writes the store before returning success; tears the session down
    /// on every failure path. Timeout is treated the same as an explicit
    /// rejection.
    async fn drive(
        transport: Arc<dyn Transport>,
        session: SessionHandle,
        timeout: Duration,
    ) -> std::result::Result<AccessCredential, ApiError> {
        let request = TransportRequest {
            method: Method::Post,
            path: REFRESH_PATH.to_string(),
            bearer: None,
            body: None,
        };

        let response = match tokio::time::timeout(timeout, transport.execute(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                warn!(error = %error, "renewal call failed");
                session.terminate();
                return Err(ApiError::SessionExpired);
            }
            Err(_) => {
                warn!("renewal call timed out");
                session.terminate();
                return Err(ApiError::SessionExpired);
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "renewal rejected");
            session.terminate();
            return Err(ApiError::SessionExpired);
        }

        let grant: CredentialGrant = match serde_json::from_value(response.body) {
            Ok(grant) => grant,
            Err(error) => {
                warn!(error = %error, "renewal response malformed");
                session.terminate();
                return Err(ApiError::SessionExpired);
            }
        };

        let credential = grant.into_credential();
        session.credentials().set(Some(credential.clone()));
        debug!("credential renewed");
        Ok(credential)
    }
}
