use crate::routing::GatewayError;

/// Error types for store synchronization.
///
/// These never cross the public [`SyncController`](super::SyncController) API; operations
/// log them and hand back a neutral value instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("Gateway error: {0}")]
	GatewayError(#[from] GatewayError),

	#[error("Response is missing {0}")]
	MissingField(&'static str),

	#[error("Event handler error: {0}")]
	HandlerError(String),
}

/// Accept `id` only if the service actually returned one.
pub(crate) fn require_id(id: Option<String>, field: &'static str) -> Result<String, StoreError> {
	id.filter(|id| !id.is_empty())
		.ok_or(StoreError::MissingField(field))
}
