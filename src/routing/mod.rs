//! Order-routing service integration.
//!
//! Wire types for groups, routes, rules and their filters/conditions, plus the HTTP
//! implementation of the [`RemoteConfigGateway`](crate::store::RemoteConfigGateway)
//! boundary.

/// HTTP client for the routing service REST endpoints
mod client;
/// Type definitions for routing service payloads
mod types;

pub use client::{GatewayConfig, HttpRoutingGateway, has_error};
pub use types::*;
