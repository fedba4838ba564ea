//! Route guarding and portal navigation for the lyceum client.
//!
//! This crate provides:
//! - The authorization guard (`decide`, `RouteRule`, `GuardOutcome`)
//! - Permission-filtered navigation (`NavEntry`)
//! - The three portal route trees and root landing dispatch (`PortalRouter`)
//!
//! Authorization denial here is a routing decision, not an error: an
//! authenticated caller who lacks a role or permission is redirected to
//! the home of their own portal, and a navigation entry they cannot use
//! is omitted rather than rendered dead.

pub mod guard;
pub mod nav;
pub mod router;

// Re-export main types at crate root
pub use guard::{GuardOutcome, RouteRule, decide};
pub use nav::NavEntry;
pub use router::{PortalRouter, PortalTree};
