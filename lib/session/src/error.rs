//! Error types for the session crate.

use std::fmt;

/// Errors from session state operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No identity is present.
    NotAuthenticated,
    /// The identity does not hold the required permission.
    PermissionDenied { permission: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::PermissionDenied { permission } => {
                write!(f, "missing required permission: {permission}")
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_authenticated_display() {
        let err = SessionError::NotAuthenticated;
        assert!(err.to_string().contains("not authenticated"));
    }

    #[test]
    fn permission_denied_display_names_permission() {
        let err = SessionError::PermissionDenied {
            permission: "COURSE_WRITE".to_string(),
        };
        assert!(err.to_string().contains("COURSE_WRITE"));
    }
}
