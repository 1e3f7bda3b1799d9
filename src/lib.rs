//! Local mirror of a server-backed order-routing configuration tree.
//!
//! [`store::SyncController`] drives every change: it calls the routing service through a
//! [`store::RemoteConfigGateway`], orders and indexes the responses with the helpers in
//! [`utils`], and merges the result into [`store::ConfigurationTreeState`].
//! [`routing::HttpRoutingGateway`] is the production gateway.

pub mod routing;
pub mod store;
pub mod utils;
