//! Sync controller for the routing configuration tree.
//!
//! This module defines the `SyncController`, the only writer of [`ConfigurationTreeState`].
//! Every operation follows the same path:
//! - call the [`RemoteConfigGateway`]
//! - treat an error response or a missing id as failure
//! - on success reshape the payload (sequence ordering, grouped indexing) and merge it
//! - on failure log, notify where the user asked for the change, and return a neutral value
//!
//! Remote errors never reach the caller. Local state only changes after the remote call
//! that justifies the change has succeeded; the documented exceptions are the `load_*`
//! operations, which clear their slot when the fetch fails.

use crate::routing::{
	CreateConditionRequest, CreateGroupRequest, DeleteConditionRequest, DeleteFilterRequest,
	GroupFilter, Route, RouteFilter, RoutingGroup, RoutingRule, RuleCondition,
};
use crate::store::{
	ConfigurationTreeState, EventDispatcher, ReferenceData, RemoteConfigGateway, RuleDetail,
	StoreError, StoreEvent, StoreEventHandler, require_id,
};
use crate::utils::{GroupedIndex, index_conditions, sort_sequence};

use chrono::Utc;
use futures::future::BoxFuture;
use tracing::{debug, error, info, warn};

/// Store-level settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
	/// Product store that scopes group listing and owns newly created groups.
	pub product_store_id: String,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			product_store_id: "STORE".to_string(),
		}
	}
}

/// Orchestrates remote calls and merges their results into the configuration tree.
///
/// Operations take `&mut self`, so two mutating operations can never overlap on one
/// controller. Callers sharing a controller across tasks must wrap it in their own lock.
pub struct SyncController {
	gateway: Box<dyn RemoteConfigGateway>,
	config: StoreConfig,
	state: ConfigurationTreeState,
	events: EventDispatcher,
	reference_data: ReferenceData,
}

impl SyncController {
	pub fn new(gateway: Box<dyn RemoteConfigGateway>, config: StoreConfig) -> Self {
		Self {
			gateway,
			config,
			state: ConfigurationTreeState::default(),
			events: EventDispatcher::new(),
			reference_data: ReferenceData::default(),
		}
	}

	pub fn with_reference_data(mut self, reference_data: ReferenceData) -> Self {
		self.reference_data = reference_data;
		self
	}

	/// Register a handler for user-facing notifications.
	pub fn register_handler(&mut self, handler: Box<dyn StoreEventHandler>) {
		self.events.register_handler(handler);
	}

	pub fn state(&self) -> &ConfigurationTreeState {
		&self.state
	}

	pub fn reference_data(&self) -> &ReferenceData {
		&self.reference_data
	}

	fn update_state(
		&mut self,
		update: impl FnOnce(ConfigurationTreeState) -> ConfigurationTreeState,
	) {
		let state = std::mem::take(&mut self.state);
		self.state = update(state);
	}

	async fn notify(&mut self, event: StoreEvent) {
		self.events.dispatch(&event).await;
	}

	/// Replace the group list with the store's groups, in sequence order.
	pub async fn list_groups(&mut self) {
		match self.fetch_groups().await {
			Ok(groups) => {
				info!("Loaded {} routing groups", groups.len());
				self.update_state(|state| state.with_groups(groups));
			}
			Err(e) => error!("Failed to fetch routing groups: {}", e),
		}
	}

	async fn fetch_groups(&self) -> Result<Vec<RoutingGroup>, StoreError> {
		let filter = GroupFilter {
			product_store_id: self.config.product_store_id.clone(),
		};
		let groups = self
			.gateway
			.fetch_routing_groups(&filter)
			.await?
			.into_iter()
			.map(|mut group| {
				group.routings = sort_sequence(&group.routings);
				group
			})
			.collect::<Vec<_>>();
		Ok(sort_sequence(&groups))
	}

	/// Create a group in the configured store and refresh the group list on success.
	pub async fn create_group(&mut self, group_name: &str) {
		let request = CreateGroupRequest {
			group_name: group_name.to_string(),
			product_store_id: self.config.product_store_id.clone(),
			created_date: Utc::now().timestamp_millis(),
		};

		let created = match self.gateway.create_routing_group(&request).await {
			Ok(ack) => require_id(ack.group_id, "groupId"),
			Err(e) => Err(e.into()),
		};

		match created {
			Ok(group_id) => {
				info!("Created routing group {} ({})", group_id, group_name);
				self.notify(StoreEvent::GroupCreated { group_id }).await;
				self.list_groups().await;
			}
			Err(e) => {
				error!("Failed to create routing group {}: {}", group_name, e);
				self.notify(StoreEvent::GroupCreationFailed).await;
			}
		}
	}

	/// Load a group with its routes. The current group is cleared if the fetch fails.
	pub async fn load_group(&mut self, group_id: &str) {
		let group = match self.fetch_group(group_id).await {
			Ok(group) => {
				debug!(
					"Loaded routing group {} with {} routes",
					group_id,
					group.routings.len()
				);
				Some(group)
			}
			Err(e) => {
				error!("Failed to fetch routing group {}: {}", group_id, e);
				None
			}
		};
		self.update_state(|state| state.with_current_group(group));
	}

	async fn fetch_group(&self, group_id: &str) -> Result<RoutingGroup, StoreError> {
		let mut group = self
			.gateway
			.fetch_routing_group_information(group_id)
			.await?;
		if group.group_id.is_empty() {
			return Err(StoreError::MissingField("groupId"));
		}
		group.routings = sort_sequence(&group.routings);
		Ok(group)
	}

	/// Create a route and merge it, with its server-assigned id, into the current group.
	///
	/// Returns the new `orderRoutingId`, or `None` if the route was not created.
	pub async fn create_route(&mut self, route: Route) -> Option<String> {
		let created = match self.gateway.create_order_routing(&route).await {
			Ok(ack) => require_id(ack.order_routing_id, "orderRoutingId"),
			Err(e) => Err(e.into()),
		};

		let order_routing_id = match created {
			Ok(id) => id,
			Err(e) => {
				error!("Failed to create order routing: {}", e);
				self.notify(StoreEvent::RouteCreationFailed).await;
				return None;
			}
		};

		let mut group = match self.state.current_group() {
			Some(group) => group.clone(),
			None => {
				warn!(
					"Route {} created without a current group loaded",
					order_routing_id
				);
				RoutingGroup::default()
			}
		};
		group.routings.push(Route {
			order_routing_id: Some(order_routing_id.clone()),
			..route
		});
		group.routings = sort_sequence(&group.routings);

		info!("Created order routing {}", order_routing_id);
		self.set_current_group(group);
		self.notify(StoreEvent::RouteCreated {
			order_routing_id: order_routing_id.clone(),
		})
		.await;
		Some(order_routing_id)
	}

	pub fn set_current_group(&mut self, group: RoutingGroup) {
		self.update_state(|state| state.with_current_group(Some(group)));
	}

	/// Load a route. The current route is cleared if the fetch fails.
	pub async fn load_route(&mut self, order_routing_id: &str) {
		match self.fetch_route(order_routing_id).await {
			Ok(route) => self.set_current_route(route),
			Err(e) => {
				error!("Failed to fetch order routing {}: {}", order_routing_id, e);
				self.update_state(|state| state.with_current_route(None));
			}
		}
	}

	async fn fetch_route(&self, order_routing_id: &str) -> Result<Route, StoreError> {
		let route = self.gateway.fetch_order_routing(order_routing_id).await?;
		require_id(route.order_routing_id.clone(), "orderRoutingId")?;
		Ok(route)
	}

	pub fn set_current_route(&mut self, route: Route) {
		self.update_state(|state| state.with_current_route(Some(route)));
	}

	/// Create a rule and merge it, with its server-assigned id, into the flat rule list.
	///
	/// Returns the new `routingRuleId`, or `None` if the rule was not created.
	pub async fn create_rule(&mut self, rule: RoutingRule) -> Option<String> {
		let created = match self.gateway.create_routing_rule(&rule).await {
			Ok(ack) => require_id(ack.routing_rule_id, "routingRuleId"),
			Err(e) => Err(e.into()),
		};

		match created {
			Ok(routing_rule_id) => {
				let mut rules = self.state.rules().to_vec();
				rules.push(RoutingRule {
					routing_rule_id: Some(routing_rule_id.clone()),
					..rule
				});
				let rules = sort_sequence(&rules);

				info!("Created routing rule {}", routing_rule_id);
				self.update_state(|state| state.with_rules(rules));
				self.notify(StoreEvent::RuleCreated {
					routing_rule_id: routing_rule_id.clone(),
				})
				.await;
				Some(routing_rule_id)
			}
			Err(e) => {
				error!("Failed to create routing rule: {}", e);
				self.notify(StoreEvent::RuleCreationFailed).await;
				None
			}
		}
	}

	/// Load and index a route's filters. The index is cleared if the fetch fails.
	pub async fn load_filters(&mut self, order_routing_id: &str) {
		let filters = match self.gateway.fetch_routing_filters(order_routing_id).await {
			Ok(filters) => index_conditions(&filters),
			Err(e) => {
				error!(
					"Failed to fetch filters for order routing {}: {}",
					order_routing_id, e
				);
				GroupedIndex::new()
			}
		};
		self.update_state(|state| state.with_route_filters(filters));
	}

	/// Delete filters one at a time. Each delete completes before the next is sent.
	///
	/// Returns `true` only if every delete succeeded. Local filters are not touched; call
	/// [`load_filters`](Self::load_filters) to resynchronize.
	pub async fn delete_filters(
		&mut self,
		order_routing_id: &str,
		filters: &[RouteFilter],
	) -> bool {
		let gateway = self.gateway.as_ref();
		let all_deleted = run_sequential("Delete routing filter", filters, |filter| {
			let request = filter
				.condition_seq_id
				.clone()
				.map(|condition_seq_id| DeleteFilterRequest {
					order_routing_id: order_routing_id.to_string(),
					condition_seq_id,
				});
			Box::pin(async move {
				let request = request.ok_or(StoreError::MissingField("conditionSeqId"))?;
				let ack = gateway.delete_routing_filter(&request).await?;
				require_id(ack.order_routing_id, "orderRoutingId").map(|_| ())
			})
		})
		.await;

		debug!(
			"Deleted {} filters from order routing {}: all succeeded = {}",
			filters.len(),
			order_routing_id,
			all_deleted
		);
		all_deleted
	}

	/// Update a route remotely. Returns the echoed `orderRoutingId`, or `None` on failure.
	pub async fn update_route(&mut self, route: &Route) -> Option<String> {
		let updated = match self.gateway.update_routing(route).await {
			Ok(ack) => require_id(ack.order_routing_id, "orderRoutingId"),
			Err(e) => Err(e.into()),
		};

		updated
			.map_err(|e| error!("Failed to update order routing: {}", e))
			.ok()
	}

	/// Load and index a rule's conditions. The index is cleared if the fetch fails.
	pub async fn load_conditions(&mut self, routing_rule_id: &str) {
		let conditions = match self.gateway.fetch_rule_conditions(routing_rule_id).await {
			Ok(conditions) => index_conditions(&conditions),
			Err(e) => {
				error!(
					"Failed to fetch conditions for routing rule {}: {}",
					routing_rule_id, e
				);
				GroupedIndex::new()
			}
		};
		self.update_state(|state| state.with_rule_conditions(conditions));
	}

	/// Delete conditions one at a time, then reload the rule's conditions whatever the
	/// outcome. Returns `true` only if every delete succeeded.
	pub async fn delete_conditions(
		&mut self,
		routing_rule_id: &str,
		conditions: &[RuleCondition],
	) -> bool {
		let gateway = self.gateway.as_ref();
		let all_deleted = run_sequential("Delete rule condition", conditions, |condition| {
			let request =
				condition
					.condition_seq_id
					.clone()
					.map(|condition_seq_id| DeleteConditionRequest {
						routing_rule_id: routing_rule_id.to_string(),
						condition_seq_id,
					});
			Box::pin(async move {
				let request = request.ok_or(StoreError::MissingField("conditionSeqId"))?;
				let ack = gateway.delete_rule_condition(&request).await?;
				require_id(ack.condition_seq_id, "conditionSeqId").map(|_| ())
			})
		})
		.await;

		self.load_conditions(routing_rule_id).await;
		all_deleted
	}

	/// Create conditions one at a time, then reload the rule's conditions whatever the
	/// outcome. Returns `true` only if every create succeeded.
	pub async fn create_conditions(
		&mut self,
		routing_rule_id: &str,
		conditions: &[RuleCondition],
	) -> bool {
		let gateway = self.gateway.as_ref();
		let all_created = run_sequential("Create rule condition", conditions, |condition| {
			let request = CreateConditionRequest {
				routing_rule_id: routing_rule_id.to_string(),
				condition: condition.clone(),
			};
			Box::pin(async move {
				let ack = gateway.create_rule_condition(&request).await?;
				require_id(ack.condition_seq_id, "conditionSeqId").map(|_| ())
			})
		})
		.await;

		self.load_conditions(routing_rule_id).await;
		all_created
	}

	/// Return a rule's expanded detail, fetching it only on a cache miss.
	///
	/// The returned value is a copy; changing it does not affect the cache. A failed fetch
	/// returns `None` and caches nothing.
	pub async fn load_rule_detail(&mut self, routing_rule_id: &str) -> Option<RuleDetail> {
		if let Some(detail) = self.state.rule_detail(routing_rule_id) {
			debug!("Rule {} served from cache", routing_rule_id);
			return Some(detail.clone());
		}

		match self.fetch_rule_detail(routing_rule_id).await {
			Ok(detail) => {
				let cached = detail.clone();
				self.update_state(|state| {
					state.with_rule_detail(routing_rule_id.to_string(), cached)
				});
				Some(detail)
			}
			Err(e) => {
				error!("Failed to fetch routing rule {}: {}", routing_rule_id, e);
				None
			}
		}
	}

	async fn fetch_rule_detail(&self, routing_rule_id: &str) -> Result<RuleDetail, StoreError> {
		let response = self.gateway.fetch_rule(routing_rule_id).await?;
		require_id(response.rule.routing_rule_id.clone(), "routingRuleId")?;
		Ok(RuleDetail::from_response(response))
	}

	/// Drop every cached rule detail. There is no per-rule invalidation.
	pub fn invalidate_rule_details(&mut self) {
		info!(
			"Invalidating {} cached rule details",
			self.state.cached_rule_count()
		);
		self.update_state(|state| state.without_rule_details());
	}
}

/// Run `op` over `items` strictly one after another.
///
/// Each call is awaited before the next is issued. A failed item is logged and does not
/// stop the remaining ones; the result is `true` only if every item succeeded.
async fn run_sequential<'a, T, F>(operation: &str, items: &'a [T], mut op: F) -> bool
where
	F: FnMut(&'a T) -> BoxFuture<'a, Result<(), StoreError>>,
{
	let mut all_succeeded = true;
	for (position, item) in items.iter().enumerate() {
		if let Err(e) = op(item).await {
			error!(
				"{} failed for item {} of {}: {}",
				operation,
				position + 1,
				items.len(),
				e
			);
			all_succeeded = false;
		}
	}
	all_succeeded
}
