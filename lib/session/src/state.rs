//! The single-owner session state container.
//!
//! Exactly one `SessionHandle` graph exists per process. All mutation of
//! session state and the credential slot goes through this handle (or the
//! renewal coordinator holding a clone of it); every other component only
//! reads snapshots or subscribes to the signal channel. That ownership
//! discipline is what makes the single-flight renewal invariant
//! enforceable.

use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::debug;

use crate::credential::CredentialStore;
use crate::error::SessionError;
use crate::identity::Identity;
use lyceum_core::Result;

/// Application-wide session lifecycle signal.
///
/// Broadcast over a watch channel so that a renewal failure in one
/// request redirects the whole application, not just the failing caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionSignal {
    /// Session is usable (or nobody has signed in yet).
    #[default]
    Active,
    /// Session died; the shell must navigate to the login screen.
    RedirectToLogin,
}

/// A point-in-time copy of the session state.
///
/// Guards and screens decide from a snapshot, never from a live borrow,
/// so a decision can never observe a half-applied transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    identity: Option<Identity>,
    loading: bool,
}

impl SessionSnapshot {
    /// Returns the authenticated identity, if present.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns true while the boot probe is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns true iff an identity is present and holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.has_permission(permission))
    }
}

struct Inner {
    state: RwLock<SessionSnapshot>,
    credentials: CredentialStore,
    signal: watch::Sender<SessionSignal>,
}

/// Handle to the process-wide session state.
///
/// Cheap to clone; all clones share the same state, credential slot, and
/// signal channel.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl SessionHandle {
    /// Creates a handle in the boot state: no identity, loading.
    #[must_use]
    pub fn new() -> Self {
        let (signal, _) = watch::channel(SessionSignal::Active);
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(SessionSnapshot {
                    identity: None,
                    loading: true,
                }),
                credentials: CredentialStore::new(),
                signal,
            }),
        }
    }

    /// Returns the shared credential store.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.read().unwrap().clone()
    }

    /// Subscribes to session lifecycle signals.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSignal> {
        self.inner.signal.subscribe()
    }

    /// Marks the start of an identity probe.
    pub fn begin_loading(&self) {
        let mut state = self.inner.state.write().unwrap();
        state.loading = true;
    }

    /// Installs a freshly probed identity and ends loading.
    pub fn set_identity(&self, identity: Identity) {
        {
            let mut state = self.inner.state.write().unwrap();
            debug!(user = %identity.id(), role = %identity.role(), "session established");
            state.identity = Some(identity);
            state.loading = false;
        }
        self.inner.signal.send_replace(SessionSignal::Active);
    }

    /// Records that the probe yielded no identity, without tearing
    /// anything else down.
    ///
    /// Used when the caller simply is not signed in, or the probe hit a
    /// transient failure; the credential slot is left alone.
    pub fn mark_unauthenticated(&self) {
        let mut state = self.inner.state.write().unwrap();
        state.identity = None;
        state.loading = false;
    }

    /// Tears the session down: credential dropped, identity cleared,
    /// redirect signal broadcast.
    ///
    /// Idempotent. Called on logout and on unrecoverable renewal failure.
    pub fn terminate(&self) {
        self.inner.credentials.clear();
        {
            let mut state = self.inner.state.write().unwrap();
            if state.identity.is_some() {
                debug!("session terminated");
            }
            state.identity = None;
            state.loading = false;
        }
        self.inner.signal.send_replace(SessionSignal::RedirectToLogin);
    }

    /// Returns true iff an identity is present and holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.snapshot().has_permission(permission)
    }

    /// Errors unless an identity is present and holds `permission`.
    pub fn require_permission(&self, permission: &str) -> Result<(), SessionError> {
        let snapshot = self.snapshot();
        let Some(identity) = snapshot.identity() else {
            return Err(SessionError::NotAuthenticated.into());
        };
        if !identity.has_permission(permission) {
            return Err(SessionError::PermissionDenied {
                permission: permission.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}
