//! In-memory access credential handling.
//!
//! The access credential is a short-lived bearer token proving identity
//! to the API. It lives only in process memory: no serde derives, no
//! durable storage, gone on drop. Renewal replaces it wholesale.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

/// A short-lived bearer credential for API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCredential {
    /// The opaque bearer token.
    token: String,
    /// When the server says the token expires, if it says at all.
    expires_at: Option<DateTime<Utc>>,
}

impl AccessCredential {
    /// Creates a credential with an unknown expiry.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    /// Sets the expiry instant.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the expiry instant, if known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns true if the credential is known to have expired.
    ///
    /// Advisory only: renewal is driven by the server rejecting the
    /// token, not by this clock check. Unknown expiry reads as not
    /// expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero())
    }

    /// Returns true if the credential expires within `window` from now.
    #[must_use]
    pub fn expires_within(&self, window: Duration) -> bool {
        match self.expires_at {
            Some(expires) => expires <= Utc::now() + window,
            None => false,
        }
    }
}

/// Shared slot holding the current access credential.
///
/// Last-write-wins; callers must not assume atomicity across a
/// read-then-write sequence from two call sites. Writes happen only from
/// the session context and the renewal coordinator.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<AccessCredential>>>,
}

impl CredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current credential.
    pub fn set(&self, credential: Option<AccessCredential>) {
        let mut slot = self.inner.write().unwrap();
        *slot = credential;
    }

    /// Returns a copy of the current credential, if any.
    #[must_use]
    pub fn get(&self) -> Option<AccessCredential> {
        self.inner.read().unwrap().clone()
    }

    /// Drops the current credential.
    pub fn clear(&self) {
        self.set(None);
    }
}
