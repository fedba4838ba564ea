//! Authenticated API dispatch and credential renewal for the lyceum client.
//!
//! This crate provides:
//! - The request dispatcher (`ApiClient`) every screen calls the API through
//! - Single-flight credential renewal (`RenewalCoordinator`)
//! - Auth endpoint wrappers (login, identity probe, logout)
//! - Session lifecycle orchestration (`SessionContext`)
//! - Client configuration (`ClientConfig`)
//!
//! # Dispatch model
//!
//! Every outbound call flows through [`ApiClient::send`], which attaches
//! the current bearer credential and inspects the response. A 401 hands
//! off to the [`RenewalCoordinator`]; on success the original request is
//! re-issued exactly once with the fresh credential. Renewal itself is
//! single-flight: however many requests fail in the same instant, exactly
//! one renewal call goes out, and every waiter shares its outcome. A
//! renewal failure tears the session down for the whole application.
//!
//! No screen talks to the transport directly; bypassing the dispatcher
//! would skip credential attachment and renewal handling.

pub mod client;
pub mod config;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod renewal;
pub mod transport;

// Re-export main types at crate root
pub use client::{ApiClient, ApiRequest, ApiResponse};
pub use config::ClientConfig;
pub use context::SessionContext;
pub use error::ApiError;
pub use renewal::RenewalCoordinator;
pub use transport::{HttpTransport, Method, Transport, TransportError, TransportRequest, TransportResponse};
