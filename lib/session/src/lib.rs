//! Session state, identity, and credential handling for the lyceum client.
//!
//! This crate provides:
//! - Role-based access control (`Role`, `Portal`, `PermissionSet`)
//! - The authenticated identity snapshot (`Identity`)
//! - In-memory credential handling (`AccessCredential`, `CredentialStore`)
//! - The single-owner session state container (`SessionHandle`)
//!
//! # Access Control Model
//!
//! Every authenticated identity carries exactly one role out of six, and a
//! set of permission strings issued by the server. The client enforces a
//! cached copy of that set verbatim: membership checks are exact, with no
//! client-side superuser bypass. Each role maps to exactly one of three
//! portals (operator, tenant admin, learner).
//!
//! # Example
//!
//! ```
//! use lyceum_session::{Identity, Portal, Role, SessionHandle, permission};
//! use lyceum_core::UserId;
//!
//! let identity = Identity::new(UserId::new(), "ada@example.edu".to_string(), Role::Faculty)
//!     .with_display_name(Some("Ada".to_string()))
//!     .with_permissions([permission::COURSE_READ, permission::COURSE_WRITE]);
//!
//! let session = SessionHandle::new();
//! session.set_identity(identity);
//!
//! assert!(session.has_permission(permission::COURSE_WRITE));
//! assert_eq!(session.snapshot().identity().unwrap().portal(), Portal::Learner);
//! ```

pub mod credential;
pub mod error;
pub mod identity;
pub mod permission;
pub mod role;
pub mod state;

// Re-export main types at crate root
pub use credential::{AccessCredential, CredentialStore};
pub use error::SessionError;
pub use identity::Identity;
pub use permission::PermissionSet;
pub use role::{Portal, Role};
pub use state::{SessionHandle, SessionSignal, SessionSnapshot};
