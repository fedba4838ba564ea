//! Session lifecycle orchestration.
//!
//! `SessionContext` is the client-visible surface of the core: boot the
//! session, log in, log out, read the snapshot, check permissions. It is
//! the only writer of session state besides the renewal coordinator.

use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::error::ApiError;
use lyceum_core::Result;
use lyceum_session::{SessionHandle, SessionSnapshot};

/// The session facade handed to the application shell.
///
/// Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct SessionContext {
    session: SessionHandle,
    client: ApiClient,
}

impl SessionContext {
    /// Wraps a configured client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            session: client.session().clone(),
            client,
        }
    }

    /// Returns the dispatcher feature screens must use for all API calls.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Returns a copy of the current session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Returns true iff the current identity holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.session.has_permission(permission)
    }

    /// Subscribes to session lifecycle signals.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<lyceum_session::SessionSignal> {
        self.session.subscribe()
    }

    /// Boots the session: probes the identity through the renewing
    /// dispatcher and resolves the loading state either way.
    ///
    /// An expired credential is silently renewed by the probe itself; a
    /// failed renewal has already torn the session down by the time the
    /// probe returns.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> SessionSnapshot {
        self.session.begin_loading();

        match self.client.fetch_identity().await {
            Ok(identity) => self.session.set_identity(identity),
            Err(error) => {
                debug!(error = %error, "identity probe failed");
                self.session.mark_unauthenticated();
            }
        }

        self.session.snapshot()
    }

    /// Logs in and populates the session from a fresh identity probe.
    ///
    /// # Errors
    ///
    /// `LoginRejected` on refusal; transport errors pass through. The
    /// session is left unauthenticated on any failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionSnapshot, ApiError> {
        self.session.begin_loading();

        if let Err(error) = self.client.login_request(email, password).await {
            self.session.mark_unauthenticated();
            return Err(error);
        }

        match self.client.fetch_identity().await {
            Ok(identity) => {
                self.session.set_identity(identity);
                Ok(self.session.snapshot())
            }
            Err(error) => {
                self.session.mark_unauthenticated();
                Err(error)
            }
        }
    }

    /// Ends the session.
    ///
    /// Local state is cleared synchronously; the server is notified on a
    /// detached task so local clearing never waits on the network.
    /// Idempotent: a second call finds no credential and sends nothing.
    pub fn logout(&self) {
        let credential = self.session.credentials().get();
        self.session.terminate();

        if let Some(credential) = credential {
            let client = self.client.clone();
            let token = credential.token().to_string();
            tokio::spawn(async move {
                if let Err(error) = client.notify_logout(token).await {
                    debug!(error = %error, "logout notification failed");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use lyceum_session::{AccessCredential, Role, SessionHandle, permission};

    fn identity_json(role: &str) -> Value {
        json!({
            "id": ulid::Ulid::new().to_string(),
            "email": "ada@example.edu",
            "displayName": "Ada",
            "role": role,
            "permissions": [permission::COURSE_READ],
        })
    }

    /// Transport for lifecycle tests: scripted identity probe, counted
    /// logout calls, refresh always rejected.
    struct LifecycleTransport {
        me_status: u16,
        me_body: Value,
        logout_calls: AtomicU32,
    }

    impl LifecycleTransport {
        fn new(me_status: u16, me_body: Value) -> Arc<Self> {
            Arc::new(Self {
                me_status,
                me_body,
                logout_calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for LifecycleTransport {
        async fn execute(
            &self,
            request: TransportRequest,
        ) -> std::result::Result<TransportResponse, TransportError> {
            tokio::task::yield_now().await;
            match request.path.as_str() {
                "/auth/me" => Ok(TransportResponse {
                    status: self.me_status,
                    body: self.me_body.clone(),
                }),
                "/auth/refresh" => Ok(TransportResponse {
                    status: 401,
                    body: Value::Null,
                }),
                "/auth/logout" => {
                    self.logout_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(TransportResponse {
                        status: 204,
                        body: Value::Null,
                    })
                }
                "/auth/login" => Ok(TransportResponse {
                    status: 200,
                    body: json!({ "accessToken": "tok_login" }),
                }),
                other => panic!("unexpected path {other}"),
            }
        }
    }

    fn context_with(transport: Arc<LifecycleTransport>) -> (SessionContext, SessionHandle) {
        let session = SessionHandle::new();
        let client = ApiClient::new(transport, session.clone());
        (SessionContext::new(client), session)
    }

    #[tokio::test]
    async fn initialize_populates_identity_on_probe_success() {
        let transport = LifecycleTransport::new(200, identity_json("STUDENT"));
        let (context, session) = context_with(transport);
        session
            .credentials()
            .set(Some(AccessCredential::new("tok")));

        let snapshot = context.initialize().await;

        let identity = snapshot.identity().expect("identity present");
        assert_eq!(identity.role(), Role::Student);
        assert!(!snapshot.is_loading());
    }

    #[tokio::test]
    async fn initialize_resolves_absent_when_probe_rejected() {
        // No credential, refresh rejected: the probe's silent renewal
        // fails and the boot resolves signed-out.
        let transport = LifecycleTransport::new(401, Value::Null);
        let (context, _session) = context_with(transport);

        let snapshot = context.initialize().await;

        assert!(snapshot.identity().is_none());
        assert!(!snapshot.is_loading());
    }

    #[tokio::test]
    async fn initialize_treats_server_error_as_signed_out() {
        let transport = LifecycleTransport::new(500, Value::Null);
        let (context, session) = context_with(transport);
        session
            .credentials()
            .set(Some(AccessCredential::new("tok")));

        let snapshot = context.initialize().await;

        assert!(snapshot.identity().is_none());
        // A transient probe failure does not revoke the credential.
        assert!(session.credentials().get().is_some());
    }

    #[tokio::test]
    async fn login_stores_credential_and_identity() {
        let transport = LifecycleTransport::new(200, identity_json("FACULTY"));
        let (context, session) = context_with(transport);

        let snapshot = context
            .login("ada@example.edu", "hunter2")
            .await
            .expect("login succeeds");

        assert_eq!(
            snapshot.identity().expect("identity").role(),
            Role::Faculty
        );
        assert_eq!(
            session.credentials().get().expect("credential").token(),
            "tok_login"
        );
    }

    #[tokio::test]
    async fn logout_clears_state_synchronously() {
        let transport = LifecycleTransport::new(200, identity_json("STUDENT"));
        let (context, session) = context_with(transport);
        session
            .credentials()
            .set(Some(AccessCredential::new("tok")));
        context.initialize().await;

        context.logout();

        // Cleared before any network round-trip could have finished.
        let snapshot = context.snapshot();
        assert!(snapshot.identity().is_none());
        assert!(!snapshot.is_loading());
        assert!(session.credentials().get().is_none());
    }

    #[tokio::test]
    async fn logout_twice_sends_one_notification() {
        let transport = LifecycleTransport::new(200, identity_json("STUDENT"));
        let (context, session) = context_with(transport.clone());
        session
            .credentials()
            .set(Some(AccessCredential::new("tok")));
        context.initialize().await;

        context.logout();
        context.logout();

        // Both calls leave the same settled state.
        let snapshot = context.snapshot();
        assert!(snapshot.identity().is_none());
        assert!(!snapshot.is_loading());

        // Let the detached notification task run.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert_eq!(transport.logout_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn has_permission_reflects_identity() {
        let transport = LifecycleTransport::new(200, identity_json("STUDENT"));
        let (context, session) = context_with(transport);
        session
            .credentials()
            .set(Some(AccessCredential::new("tok")));

        assert!(!context.has_permission(permission::COURSE_READ));
        context.initialize().await;
        assert!(context.has_permission(permission::COURSE_READ));
        assert!(!context.has_permission(permission::COURSE_WRITE));
    }
}
