//! Wire types and wrappers for the auth endpoints.
//!
//! Four endpoints make up the auth surface: login, refresh, the identity
//! probe, and logout. Everything else on the API is plain
//! `ApiClient::send` traffic owned by feature screens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use lyceum_core::Result;
use lyceum_session::{AccessCredential, Identity};

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const IDENTITY_PATH: &str = "/auth/me";
pub(crate) const LOGOUT_PATH: &str = "/auth/logout";

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// A minted credential, as returned by login and refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CredentialGrant {
    access_token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl CredentialGrant {
    /// Converts the grant into an in-memory credential.
    pub(crate) fn into_credential(self) -> AccessCredential {
        AccessCredential::new(self.access_token).with_expiry(self.expires_at)
    }
}

impl ApiClient {
    /// Exchanges email/password for a credential and stores it.
    ///
    /// Uses the no-renewal path: a rejected login is a login failure,
    /// never a trigger for a renewal round.
    ///
    /// # Errors
    ///
    /// `LoginRejected` with the server's status on refusal.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login_request(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request =
            ApiRequest::post(LOGIN_PATH).with_json(&LoginRequest { email, password })?;
        let response = self.send_without_renewal(request).await?;

        if !response.is_success() {
            return Err(ApiError::LoginRejected {
                status: response.status(),
            }
            .into());
        }

        let grant: CredentialGrant = response.json()?;
        self.session()
            .credentials()
            .set(Some(grant.into_credential()));
        debug!("login accepted");
        Ok(())
    }

    /// Probes `GET /auth/me` for the caller's identity.
    ///
    /// Goes through the renewing dispatcher, so an expired credential is
    /// silently renewed before this returns.
    #[instrument(skip(self))]
    pub async fn fetch_identity(&self) -> Result<Identity, ApiError> {
        let response = self.send(ApiRequest::get(IDENTITY_PATH)).await?;

        if !response.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: response.status(),
            }
            .into());
        }

        response.json()
    }

    /// Tells the server the session is over. Best-effort; the caller
    /// decides whether to wait.
    ///
    /// Takes the token explicitly because the local store has already
    /// been cleared by the time this runs.
    pub(crate) async fn notify_logout(&self, token: String) -> Result<(), ApiError> {
        let mut request = ApiRequest::post(LOGOUT_PATH);
        request = request.with_bearer_override(token);
        let response = self.send_without_renewal(request).await?;
        debug!(status = response.status(), "logout notified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grant_parses_token_only() {
        let grant: CredentialGrant =
            serde_json::from_value(json!({ "accessToken": "tok" })).expect("deserialize");
        let credential = grant.into_credential();
        assert_eq!(credential.token(), "tok");
        assert!(credential.expires_at().is_none());
    }

    #[test]
    fn grant_parses_expiry_when_present() {
        let grant: CredentialGrant = serde_json::from_value(json!({
            "accessToken": "tok",
            "expiresAt": "2026-08-06T12:00:00Z"
        }))
        .expect("deserialize");
        let credential = grant.into_credential();
        assert!(credential.expires_at().is_some());
    }

    #[test]
    fn login_body_serializes_credentials() {
        let body = serde_json::to_value(LoginRequest {
            email: "ada@example.edu",
            password: "hunter2",
        })
        .expect("serialize");
        assert_eq!(body["email"], "ada@example.edu");
        assert_eq!(body["password"], "hunter2");
    }
}
