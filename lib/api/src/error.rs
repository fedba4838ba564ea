//! Error types for API dispatch and renewal.
//!
//! The variants mirror what feature screens are allowed to observe:
//! transient transport failures and login rejections reach them;
//! authentication expiry is absorbed by renewal and only surfaces as
//! `SessionExpired` when renewal itself fails.

use std::fmt;

/// Errors from dispatching API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response.
    Transport { details: String },
    /// The request or renewal call timed out.
    Timeout,
    /// The server rejected a freshly renewed credential; the retry
    /// budget is spent.
    CredentialRejected,
    /// Renewal failed; the session has been torn down.
    SessionExpired,
    /// The login call was rejected (bad credentials, locked account).
    LoginRejected { status: u16 },
    /// A typed endpoint returned a status the caller cannot use.
    UnexpectedStatus { status: u16 },
    /// A response body did not match the expected shape.
    Decode { details: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { details } => write!(f, "transport failure: {details}"),
            Self::Timeout => write!(f, "request timed out"),
            Self::CredentialRejected => {
                write!(f, "server rejected the renewed credential")
            }
            Self::SessionExpired => write!(f, "session expired"),
            Self::LoginRejected { status } => {
                write!(f, "login rejected with status {status}")
            }
            Self::UnexpectedStatus { status } => {
                write!(f, "unexpected response status {status}")
            }
            Self::Decode { details } => write!(f, "failed to decode response: {details}"),
        }
    }
}

impl std::error::Error for ApiError {}
