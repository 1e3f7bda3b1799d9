//! Event system for user-facing store notifications.
//!
//! User-initiated operations report their outcome as a [`StoreEvent`]. The controller hands
//! each event to an [`EventDispatcher`], which fans it out to every registered
//! [`StoreEventHandler`]; presenting the message (toast, status bar, log line) is up to the
//! handler.

use crate::store::StoreError;
use tracing::{error, info, warn};

/// Outcomes of user-initiated operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
	GroupCreated { group_id: String },
	GroupCreationFailed,
	RouteCreated { order_routing_id: String },
	RouteCreationFailed,
	RuleCreated { routing_rule_id: String },
	RuleCreationFailed,
}

impl StoreEvent {
	/// Message shown to the user.
	pub fn message(&self) -> &'static str {
		match self {
			StoreEvent::GroupCreated { .. } => "Brokering run created",
			StoreEvent::GroupCreationFailed => "Failed to create brokering run",
			StoreEvent::RouteCreated { .. } => "New routing created",
			StoreEvent::RouteCreationFailed => "Failed to create order routing",
			StoreEvent::RuleCreated { .. } => "New Inventory Rule Created",
			StoreEvent::RuleCreationFailed => "Failed to create rule",
		}
	}

	pub fn is_failure(&self) -> bool {
		matches!(
			self,
			StoreEvent::GroupCreationFailed
				| StoreEvent::RouteCreationFailed
				| StoreEvent::RuleCreationFailed
		)
	}
}

/// Trait for handling store events.
#[async_trait::async_trait]
pub trait StoreEventHandler: Send + Sync {
	async fn handle(&mut self, event: &StoreEvent) -> Result<(), StoreError>;

	/// Get the name of this handler for logging and diagnostics.
	fn name(&self) -> &'static str;
}

/// Event dispatcher that manages multiple event handlers.
///
/// Handlers are called in registration order. A failing handler is logged and does not
/// prevent the remaining handlers from seeing the event.
#[derive(Default)]
pub struct EventDispatcher {
	handlers: Vec<Box<dyn StoreEventHandler>>,
}

impl EventDispatcher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register_handler(&mut self, handler: Box<dyn StoreEventHandler>) {
		self.handlers.push(handler);
	}

	pub fn handler_count(&self) -> usize {
		self.handlers.len()
	}

	pub async fn dispatch(&mut self, event: &StoreEvent) {
		for handler in &mut self.handlers {
			if let Err(e) = handler.handle(event).await {
				error!("Handler {} failed to process event: {}", handler.name(), e);
			}
		}
	}
}

/// Writes every notification to the log.
pub struct LoggingEventHandler;

#[async_trait::async_trait]
impl StoreEventHandler for LoggingEventHandler {
	async fn handle(&mut self, event: &StoreEvent) -> Result<(), StoreError> {
		if event.is_failure() {
			warn!("{}", event.message());
		} else {
			info!("{}: {:?}", event.message(), event);
		}
		Ok(())
	}

	fn name(&self) -> &'static str {
		"LoggingEventHandler"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	struct Recorder {
		seen: Arc<Mutex<Vec<String>>>,
		fail: bool,
	}

	#[async_trait::async_trait]
	impl StoreEventHandler for Recorder {
		async fn handle(&mut self, event: &StoreEvent) -> Result<(), StoreError> {
			self.seen.lock().unwrap().push(event.message().to_string());
			if self.fail {
				return Err(StoreError::HandlerError("toast unavailable".to_string()));
			}
			Ok(())
		}

		fn name(&self) -> &'static str {
			"Recorder"
		}
	}

	#[tokio::test]
	async fn failing_handler_does_not_block_the_rest() {
		let first = Arc::new(Mutex::new(Vec::new()));
		let second = Arc::new(Mutex::new(Vec::new()));

		let mut dispatcher = EventDispatcher::new();
		dispatcher.register_handler(Box::new(Recorder {
			seen: first.clone(),
			fail: true,
		}));
		dispatcher.register_handler(Box::new(Recorder {
			seen: second.clone(),
			fail: false,
		}));
		dispatcher.register_handler(Box::new(LoggingEventHandler));

		dispatcher.dispatch(&StoreEvent::RouteCreationFailed).await;

		assert_eq!(*first.lock().unwrap(), vec!["Failed to create order routing"]);
		assert_eq!(*second.lock().unwrap(), vec!["Failed to create order routing"]);
		assert_eq!(dispatcher.handler_count(), 3);
	}

	#[test]
	fn failure_events_are_flagged() {
		assert!(StoreEvent::GroupCreationFailed.is_failure());
		assert!(
			!StoreEvent::RuleCreated {
				routing_rule_id: "R1".to_string()
			}
			.is_failure()
		);
	}
}
