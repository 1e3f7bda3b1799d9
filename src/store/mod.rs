//! Routing Configuration Store
//!
//! This module keeps the local mirror of the server-side routing configuration tree
//! (groups → routes → rules → filters/conditions) and the logic that keeps it in sync:
//!
//! - `controller`: The `SyncController`, sole writer of the state. Calls the gateway, reshapes responses, merges results.
//! - `gateway`: The `RemoteConfigGateway` trait, the boundary to the routing service.
//! - `state`: `ConfigurationTreeState`, the immutable-update snapshot read by the presentation layer, and `RuleDetail`.
//! - `events`: User-facing notifications and the dispatcher that delivers them.
//! - `reference`: Read-only enumeration and facility lookup tables.
//! - `types`: Store error types.

/// Orchestrates remote calls and state merges
pub mod controller;
/// User-facing notification events
pub mod events;
/// Boundary trait for the routing service
pub mod gateway;
/// Read-only reference data
pub mod reference;
/// Configuration tree snapshot
pub mod state;
/// Error types
pub mod types;

pub use controller::{StoreConfig, SyncController};
pub use events::{EventDispatcher, LoggingEventHandler, StoreEvent, StoreEventHandler};
pub use gateway::RemoteConfigGateway;
pub use reference::{LookupTable, ReferenceData};
pub use state::{ConfigurationTreeState, RuleDetail};
pub use types::StoreError;
pub(crate) use types::require_id;
